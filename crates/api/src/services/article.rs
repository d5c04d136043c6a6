use inkpost_auth::validation::non_blank;
use inkpost_auth::SudoGate;
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::{Article, CreateArticleRequest, UpdateArticleRequest};

const ARTICLE_SELECT: &str = r#"
    SELECT a.id, a.public_id, a.user_id, u.public_id AS author_id,
           c.public_id AS category_id, a.title, a.content, a.created_at, a.updated_at
    FROM articles a
    JOIN users u ON u.id = a.user_id
    LEFT JOIN categories c ON c.id = a.category_id
"#;

/// The caller's articles, newest first, optionally limited to one category.
pub async fn list_articles(
    pool: &SqlitePool,
    user_id: i64,
    category_public_id: Option<&str>,
) -> Result<Vec<Article>, ServiceError> {
    let articles = match category_public_id {
        Some(category_public_id) => {
            let category_id = owned_category_id(pool, user_id, category_public_id).await?;
            sqlx::query_as::<_, Article>(&format!(
                "{ARTICLE_SELECT} WHERE a.user_id = ? AND a.category_id = ? ORDER BY a.created_at DESC, a.id DESC"
            ))
            .bind(user_id)
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Article>(&format!(
                "{ARTICLE_SELECT} WHERE a.user_id = ? ORDER BY a.created_at DESC, a.id DESC"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(articles)
}

/// Any logged-in user may read any article.
pub async fn get_article(pool: &SqlitePool, article_public_id: &str) -> Result<Article, ServiceError> {
    sqlx::query_as::<_, Article>(&format!("{ARTICLE_SELECT} WHERE a.public_id = ?"))
        .bind(article_public_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::ArticleNotFound)
}

pub async fn create_article(
    pool: &SqlitePool,
    user_id: i64,
    req: CreateArticleRequest,
) -> Result<Article, ServiceError> {
    let title = non_blank(req.title).ok_or(ServiceError::ArticleTitleMissing)?;

    let category_id = match non_blank(req.category_id) {
        Some(category_public_id) => {
            Some(owned_category_id(pool, user_id, &category_public_id).await?)
        }
        None => None,
    };

    let public_id = cuid2::create_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO articles (public_id, user_id, category_id, title, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&public_id)
    .bind(user_id)
    .bind(category_id)
    .bind(&title)
    .bind(req.content.unwrap_or_default())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get_article(pool, &public_id).await
}

pub async fn update_article(
    pool: &SqlitePool,
    user_id: i64,
    article_public_id: &str,
    req: UpdateArticleRequest,
) -> Result<Article, ServiceError> {
    let article = get_article(pool, article_public_id).await?;
    if article.user_id != user_id {
        return Err(ServiceError::Forbidden);
    }

    let title = match req.title {
        Some(title) => Some(non_blank(Some(title)).ok_or(ServiceError::ArticleTitleMissing)?),
        None => None,
    };

    // Outer `None` keeps the current category, inner `None` detaches it.
    let category_id = match req.category_id {
        Some(category_public_id) => match non_blank(Some(category_public_id)) {
            Some(category_public_id) => {
                Some(Some(owned_category_id(pool, user_id, &category_public_id).await?))
            }
            None => Some(None),
        },
        None => None,
    };

    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE articles
        SET title = COALESCE(?, title),
            content = COALESCE(?, content),
            category_id = CASE WHEN ? THEN ? ELSE category_id END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(req.content)
    .bind(category_id.is_some())
    .bind(category_id.flatten())
    .bind(&now)
    .bind(article.row_id)
    .execute(pool)
    .await?;

    get_article(pool, article_public_id).await
}

pub async fn delete_article(
    pool: &SqlitePool,
    user_id: i64,
    article_public_id: &str,
) -> Result<(), ServiceError> {
    let article = get_article(pool, article_public_id).await?;
    if article.user_id != user_id {
        return Err(ServiceError::Forbidden);
    }

    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(article.row_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_all_articles(
    pool: &SqlitePool,
    sudo: &SudoGate,
    sudo_secret: Option<&str>,
) -> Result<u64, ServiceError> {
    sudo.authorize(sudo_secret)?;

    let result = sqlx::query("DELETE FROM articles").execute(pool).await?;
    tracing::warn!(removed = result.rows_affected(), "deleted all articles");
    Ok(result.rows_affected())
}

async fn owned_category_id(
    pool: &SqlitePool,
    user_id: i64,
    category_public_id: &str,
) -> Result<i64, ServiceError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE public_id = ? AND user_id = ?")
        .bind(category_public_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::CategoryNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::category::{create_category, delete_category};
    use crate::services::test_utils::{insert_user, test_pool};

    fn draft(title: &str, category_id: Option<&str>) -> CreateArticleRequest {
        CreateArticleRequest {
            title: Some(title.into()),
            content: Some(format!("{title} body")),
            category_id: category_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_then_list_newest_first() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;

        create_article(&pool, ada, draft("first", None)).await.unwrap();
        create_article(&pool, ada, draft("second", None)).await.unwrap();

        let titles: Vec<_> = list_articles(&pool, ada, None)
            .await
            .unwrap()
            .into_iter()
            .map(|article| article.title)
            .collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;

        assert!(matches!(
            create_article(&pool, ada, draft("   ", None)).await,
            Err(ServiceError::ArticleTitleMissing)
        ));
    }

    #[tokio::test]
    async fn category_must_belong_to_author() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let bea = insert_user(&pool, "bea@example.com").await;
        let category = create_category(&pool, ada, Some("rust".into())).await.unwrap();

        assert!(matches!(
            create_article(&pool, bea, draft("borrowed", Some(&category.public_id))).await,
            Err(ServiceError::CategoryNotFound)
        ));

        let article = create_article(&pool, ada, draft("owned", Some(&category.public_id)))
            .await
            .unwrap();
        assert_eq!(article.category_id.as_deref(), Some(category.public_id.as_str()));
    }

    #[tokio::test]
    async fn filter_by_category() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let rust = create_category(&pool, ada, Some("rust".into())).await.unwrap();

        create_article(&pool, ada, draft("tagged", Some(&rust.public_id))).await.unwrap();
        create_article(&pool, ada, draft("untagged", None)).await.unwrap();

        let tagged = list_articles(&pool, ada, Some(&rust.public_id)).await.unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "tagged");

        assert!(matches!(
            list_articles(&pool, ada, Some("missing")).await,
            Err(ServiceError::CategoryNotFound)
        ));
    }

    #[tokio::test]
    async fn only_owner_may_update_or_delete() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let bea = insert_user(&pool, "bea@example.com").await;
        let article = create_article(&pool, ada, draft("mine", None)).await.unwrap();

        let edit = UpdateArticleRequest {
            title: Some("hijacked".into()),
            ..UpdateArticleRequest::default()
        };
        assert!(matches!(
            update_article(&pool, bea, &article.public_id, edit).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            delete_article(&pool, bea, &article.public_id).await,
            Err(ServiceError::Forbidden)
        ));

        // Reading is open to everyone.
        assert_eq!(get_article(&pool, &article.public_id).await.unwrap().title, "mine");

        delete_article(&pool, ada, &article.public_id).await.unwrap();
        assert!(matches!(
            get_article(&pool, &article.public_id).await,
            Err(ServiceError::ArticleNotFound)
        ));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let rust = create_category(&pool, ada, Some("rust".into())).await.unwrap();
        let article = create_article(&pool, ada, draft("draft", Some(&rust.public_id)))
            .await
            .unwrap();

        let updated = update_article(
            &pool,
            ada,
            &article.public_id,
            UpdateArticleRequest {
                content: Some("rewritten".into()),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.content, "rewritten");
        assert_eq!(updated.category_id.as_deref(), Some(rust.public_id.as_str()));

        let detached = update_article(
            &pool,
            ada,
            &article.public_id,
            UpdateArticleRequest {
                category_id: Some(String::new()),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(detached.category_id, None);

        assert!(matches!(
            update_article(
                &pool,
                ada,
                &article.public_id,
                UpdateArticleRequest {
                    title: Some(" ".into()),
                    ..UpdateArticleRequest::default()
                },
            )
            .await,
            Err(ServiceError::ArticleTitleMissing)
        ));
    }

    #[tokio::test]
    async fn deleting_category_detaches_articles() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        let rust = create_category(&pool, ada, Some("rust".into())).await.unwrap();
        let article = create_article(&pool, ada, draft("tagged", Some(&rust.public_id)))
            .await
            .unwrap();

        delete_category(&pool, ada, &rust.public_id).await.unwrap();

        let article = get_article(&pool, &article.public_id).await.unwrap();
        assert_eq!(article.category_id, None);
    }

    #[tokio::test]
    async fn delete_all_requires_sudo() {
        let (pool, _dir) = test_pool().await;
        let ada = insert_user(&pool, "ada@example.com").await;
        create_article(&pool, ada, draft("one", None)).await.unwrap();

        let gate = SudoGate::new(Some("secret".into()));
        assert!(delete_all_articles(&pool, &gate, None).await.is_err());
        assert_eq!(delete_all_articles(&pool, &gate, Some("secret")).await.unwrap(), 1);
        assert!(list_articles(&pool, ada, None).await.unwrap().is_empty());
    }
}
