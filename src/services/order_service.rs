use mongodb::bson::oid::ObjectId;

use super::parse_object_id;
use super::upload_service::{ParsedForm, UploadRules};
use crate::database::{OrderStore, UserStore};
use crate::models::{NewOrder, Order, MAX_ORDER_PHOTOS};
use crate::utils::AppError;

/// Public URL prefix under which stored photos are served.
pub const UPLOADS_URL_PREFIX: &str = "uploads";

pub const PHOTO_RULES: UploadRules = UploadRules {
    file_field: "photos",
    max_files: MAX_ORDER_PHOTOS,
    max_file_bytes: 10 * 1024 * 1024,
    images_only: false,
};

/// Persists a new Pending order from a parsed multipart form. On any
/// failure the uploaded photos are removed again.
pub async fn create_order(
    users: &dyn UserStore,
    orders: &dyn OrderStore,
    form: ParsedForm,
) -> Result<Order, AppError> {
    let result = insert_from_form(users, orders, &form).await;
    if result.is_err() {
        form.discard().await;
    }
    result
}

async fn insert_from_form(
    users: &dyn UserStore,
    orders: &dyn OrderStore,
    form: &ParsedForm,
) -> Result<Order, AppError> {
    let new_order = validate_form(form)?;

    if users.find_by_id(new_order.customer).await?.is_none() {
        return Err(AppError::InvalidRequest("Unknown user".to_string()));
    }

    orders.insert_order(Order::from(new_order)).await
}

fn validate_form(form: &ParsedForm) -> Result<NewOrder, AppError> {
    let (user_id, category, weight, date, time) = match (
        form.text("userId"),
        form.text("category"),
        form.text("weight"),
        form.text("date"),
        form.text("time"),
    ) {
        (Some(u), Some(c), Some(w), Some(d), Some(t)) => (u, c, w, d, t),
        _ => return Err(AppError::InvalidRequest("All fields are required".to_string())),
    };

    if form.files.is_empty() {
        return Err(AppError::InvalidRequest("At least one photo is required".to_string()));
    }

    let weight: f64 = weight
        .parse()
        .ok()
        .filter(|w: &f64| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| AppError::InvalidRequest("Weight must be a number".to_string()))?;

    Ok(NewOrder {
        customer: parse_object_id(user_id, "user id")?,
        category: category.to_string(),
        weight,
        photos: form
            .files
            .iter()
            .map(|f| format!("{}/{}", UPLOADS_URL_PREFIX, f.file_name))
            .collect(),
        date: date.to_string(),
        time: time.to_string(),
    })
}

/// A user's orders, newest first.
pub async fn list_orders(orders: &dyn OrderStore, user_id: &str) -> Result<Vec<Order>, AppError> {
    let customer: ObjectId = parse_object_id(user_id, "user id")?;
    orders.orders_for_customer(customer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::models::OrderStatus;
    use crate::services::upload_service::StoredFile;
    use mongodb::bson::DateTime as BsonDateTime;
    use std::path::Path;

    fn form(user_id: &str, photos: usize, dir: &Path) -> ParsedForm {
        let mut form = ParsedForm::default();
        for (k, v) in [
            ("userId", user_id),
            ("category", "Wash & Fold"),
            ("weight", "4.5"),
            ("date", "2024-08-01"),
            ("time", "10:30"),
        ] {
            form.fields.insert(k.to_string(), v.to_string());
        }
        for i in 0..photos {
            let file_name = format!("photo-{}.jpg", i);
            let path = dir.join(&file_name);
            std::fs::write(&path, b"jpg").unwrap();
            form.files.push(StoredFile {
                file_name,
                path,
                original_name: None,
                size: 3,
            });
        }
        form
    }

    async fn store_with_user() -> (InMemoryStore, String) {
        let store = InMemoryStore::new();
        let user = store.upsert_otp("7777777777", "1234", BsonDateTime::now()).await.unwrap();
        (store, user.id_hex())
    }

    #[tokio::test]
    async fn test_create_order_pending_with_photo_paths() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user().await;

        let order = create_order(&store, &store, form(&user_id, 2, dir.path())).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.weight, 4.5);
        assert_eq!(order.photos, vec!["uploads/photo-0.jpg", "uploads/photo-1.jpg"]);
        assert!(order.id.is_some());
    }

    #[tokio::test]
    async fn test_create_order_without_photos_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user().await;

        let err = create_order(&store, &store, form(&user_id, 0, dir.path())).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_field_fails_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user().await;
        let mut f = form(&user_id, 1, dir.path());
        f.fields.remove("category");
        let photo = f.files[0].path.clone();

        let err = create_order(&store, &store, f).await.unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
        assert!(!photo.exists());
    }

    #[tokio::test]
    async fn test_non_numeric_weight_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user().await;
        let mut f = form(&user_id, 1, dir.path());
        f.fields.insert("weight".into(), "heavy".into());

        assert!(create_order(&store, &store, f).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryStore::new();
        let f = form(&ObjectId::new().to_hex(), 1, dir.path());

        let err = create_order(&store, &store, f).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown user");
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user().await;

        let first = create_order(&store, &store, form(&user_id, 1, dir.path())).await.unwrap();
        let second = create_order(&store, &store, form(&user_id, 1, dir.path())).await.unwrap();

        let listed = list_orders(&store, &user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_orders_rejects_bad_id() {
        let store = InMemoryStore::new();
        assert!(matches!(
            list_orders(&store, "not-an-id").await,
            Err(AppError::InvalidRequest(_))
        ));
    }
}
