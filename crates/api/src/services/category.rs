use inkpost_auth::store::is_unique_violation;
use inkpost_auth::validation::non_blank;
use inkpost_auth::SudoGate;
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::Category;

const CATEGORY_COLUMNS: &str = "id, public_id, user_id, name, created_at, updated_at";

pub async fn list_categories(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Category>, ServiceError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE user_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(
    pool: &SqlitePool,
    user_id: i64,
    category_public_id: &str,
) -> Result<Category, ServiceError> {
    sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE public_id = ? AND user_id = ?"
    ))
    .bind(category_public_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServiceError::CategoryNotFound)
}

pub async fn create_category(
    pool: &SqlitePool,
    user_id: i64,
    name: Option<String>,
) -> Result<Category, ServiceError> {
    let name = non_blank(name).ok_or(ServiceError::CategoryNameMissing)?;
    let public_id = cuid2::create_id();
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (public_id, user_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&public_id)
    .bind(user_id)
    .bind(&name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(duplicate_or_database)?;

    Ok(Category {
        row_id: result.last_insert_rowid(),
        public_id,
        user_id,
        name,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn rename_category(
    pool: &SqlitePool,
    user_id: i64,
    category_public_id: &str,
    name: Option<String>,
) -> Result<Category, ServiceError> {
    let name = non_blank(name).ok_or(ServiceError::CategoryNameMissing)?;
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "UPDATE categories SET name = ?, updated_at = ? WHERE public_id = ? AND user_id = ?",
    )
    .bind(&name)
    .bind(&now)
    .bind(category_public_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(duplicate_or_database)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::CategoryNotFound);
    }

    get_category(pool, user_id, category_public_id).await
}

pub async fn delete_category(
    pool: &SqlitePool,
    user_id: i64,
    category_public_id: &str,
) -> Result<(), ServiceError> {
    let result = sqlx::query("DELETE FROM categories WHERE public_id = ? AND user_id = ?")
        .bind(category_public_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::CategoryNotFound);
    }

    Ok(())
}

/// Remove every category of every user. Articles lose their category.
pub async fn delete_all_categories(
    pool: &SqlitePool,
    sudo: &SudoGate,
    sudo_secret: Option<&str>,
) -> Result<u64, ServiceError> {
    sudo.authorize(sudo_secret)?;

    let result = sqlx::query("DELETE FROM categories").execute(pool).await?;
    tracing::warn!(removed = result.rows_affected(), "deleted all categories");
    Ok(result.rows_affected())
}

fn duplicate_or_database(err: sqlx::Error) -> ServiceError {
    if is_unique_violation(&err) {
        ServiceError::DuplicateCategory
    } else {
        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils::{insert_user, test_pool};

    #[tokio::test]
    async fn create_and_list_in_creation_order() {
        let (pool, _dir) = test_pool().await;
        let user = insert_user(&pool, "ada@example.com").await;

        create_category(&pool, user, Some("rust".into())).await.unwrap();
        create_category(&pool, user, Some("  sqlite  ".into())).await.unwrap();

        let names: Vec<_> = list_categories(&pool, user)
            .await
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, ["rust", "sqlite"]);
    }

    #[tokio::test]
    async fn blank_and_duplicate_names_are_rejected() {
        let (pool, _dir) = test_pool().await;
        let user = insert_user(&pool, "ada@example.com").await;

        assert!(matches!(
            create_category(&pool, user, Some("   ".into())).await,
            Err(ServiceError::CategoryNameMissing)
        ));
        assert!(matches!(
            create_category(&pool, user, None).await,
            Err(ServiceError::CategoryNameMissing)
        ));

        create_category(&pool, user, Some("rust".into())).await.unwrap();
        assert!(matches!(
            create_category(&pool, user, Some("rust".into())).await,
            Err(ServiceError::DuplicateCategory)
        ));
    }

    #[tokio::test]
    async fn same_name_is_allowed_for_different_users() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let bea = insert_user(&pool, "bea@example.com").await;

        create_category(&pool, ada, Some("rust".into())).await.unwrap();
        create_category(&pool, bea, Some("rust".into())).await.unwrap();
    }

    #[tokio::test]
    async fn rename_is_scoped_to_owner() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let bea = insert_user(&pool, "bea@example.com").await;

        let category = create_category(&pool, ada, Some("rust".into())).await.unwrap();

        assert!(matches!(
            rename_category(&pool, bea, &category.public_id, Some("mine".into())).await,
            Err(ServiceError::CategoryNotFound)
        ));

        let renamed = rename_category(&pool, ada, &category.public_id, Some("systems".into()))
            .await
            .unwrap();
        assert_eq!(renamed.name, "systems");
        assert_eq!(renamed.public_id, category.public_id);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let bea = insert_user(&pool, "bea@example.com").await;

        let category = create_category(&pool, ada, Some("rust".into())).await.unwrap();

        assert!(matches!(
            delete_category(&pool, bea, &category.public_id).await,
            Err(ServiceError::CategoryNotFound)
        ));
        delete_category(&pool, ada, &category.public_id).await.unwrap();
        assert!(list_categories(&pool, ada).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_requires_sudo() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        create_category(&pool, ada, Some("rust".into())).await.unwrap();

        let gate = SudoGate::new(Some("secret".into()));
        assert!(matches!(
            delete_all_categories(&pool, &gate, Some("nope")).await,
            Err(ServiceError::Auth(_))
        ));
        assert_eq!(list_categories(&pool, ada).await.unwrap().len(), 1);

        assert_eq!(delete_all_categories(&pool, &gate, Some("secret")).await.unwrap(), 1);
        assert!(list_categories(&pool, ada).await.unwrap().is_empty());
    }
}
