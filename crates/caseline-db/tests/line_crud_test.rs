//! Integration tests for product-line CRUD operations.
//!
//! Uses the shared PostgreSQL container from `caseline-test-utils`; each
//! test gets a unique temporary database that is dropped on completion.

use uuid::Uuid;

use caseline_db::models::ProductLine;
use caseline_db::queries::{product_lines, seed};

use caseline_test_utils::{create_test_db, drop_test_db};

async fn fixture_contact(pool: &sqlx::PgPool) -> Uuid {
    let location = seed::insert_location(pool, "Porto").await.unwrap();
    let product = seed::insert_product(pool, "FiberNet").await.unwrap();
    let contact = seed::insert_contact(
        pool,
        "Rey Ordonez",
        Some(product.id),
        Some(location.id),
        Some(5.0),
        false,
    )
    .await
    .unwrap();
    contact.id
}

fn new_line(contact_id: Uuid) -> ProductLine {
    ProductLine {
        id: None,
        contact_id,
        product_id: None,
        plan_type: None,
        price: None,
        discount: None,
    }
}

#[tokio::test]
async fn insert_assigns_id_and_list_returns_in_order() {
    let (pool, db_name) = create_test_db().await;
    let contact_id = fixture_contact(&pool).await;

    let first = product_lines::insert_line(
        &pool,
        &ProductLine {
            plan_type: Some("Basic".to_string()),
            price: Some(19.9),
            ..new_line(contact_id)
        },
    )
    .await
    .expect("insert should succeed");
    assert!(first.is_saved());

    let second = product_lines::insert_line(
        &pool,
        &ProductLine {
            plan_type: Some("Plus".to_string()),
            price: Some(39.9),
            ..new_line(contact_id)
        },
    )
    .await
    .unwrap();

    let listed = product_lines::list_for_contact(&pool, contact_id)
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
    assert_eq!(listed[0].plan_type.as_deref(), Some("Basic"));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn list_is_scoped_to_the_owning_contact() {
    let (pool, db_name) = create_test_db().await;
    let contact_a = fixture_contact(&pool).await;
    let contact_b = seed::insert_contact(&pool, "Lena Brandt", None, None, None, false)
        .await
        .unwrap()
        .id;

    product_lines::insert_line(&pool, &new_line(contact_a))
        .await
        .unwrap();
    product_lines::insert_line(&pool, &new_line(contact_b))
        .await
        .unwrap();

    let listed = product_lines::list_for_contact(&pool, contact_a).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].contact_id, contact_a);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_replaces_editable_fields() {
    let (pool, db_name) = create_test_db().await;
    let contact_id = fixture_contact(&pool).await;

    let line = product_lines::insert_line(&pool, &new_line(contact_id))
        .await
        .unwrap();

    let edited = ProductLine {
        plan_type: Some("Premium".to_string()),
        price: Some(59.9),
        discount: Some(10.0),
        ..line.clone()
    };
    let touched = product_lines::update_line(&pool, line.id.unwrap(), &edited)
        .await
        .expect("update should succeed");
    assert_eq!(touched, 1);

    let listed = product_lines::list_for_contact(&pool, contact_id).await.unwrap();
    assert_eq!(listed[0].plan_type.as_deref(), Some("Premium"));
    assert_eq!(listed[0].price, Some(59.9));
    assert_eq!(listed[0].discount, Some(10.0));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_missing_line_touches_no_rows() {
    let (pool, db_name) = create_test_db().await;
    let contact_id = fixture_contact(&pool).await;

    let touched = product_lines::update_line(&pool, Uuid::new_v4(), &new_line(contact_id))
        .await
        .unwrap();
    assert_eq!(touched, 0);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_by_ids_removes_only_named_rows() {
    let (pool, db_name) = create_test_db().await;
    let contact_id = fixture_contact(&pool).await;

    let keep = product_lines::insert_line(&pool, &new_line(contact_id))
        .await
        .unwrap();
    let gone = product_lines::insert_line(&pool, &new_line(contact_id))
        .await
        .unwrap();

    let removed = product_lines::delete_by_ids(&pool, &[gone.id.unwrap()])
        .await
        .expect("delete should succeed");
    assert_eq!(removed, 1);

    let listed = product_lines::list_for_contact(&pool, contact_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep.id);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_with_empty_id_list_is_a_noop() {
    let (pool, db_name) = create_test_db().await;
    let contact_id = fixture_contact(&pool).await;

    product_lines::insert_line(&pool, &new_line(contact_id))
        .await
        .unwrap();

    let removed = product_lines::delete_by_ids(&pool, &[]).await.unwrap();
    assert_eq!(removed, 0);
    assert_eq!(
        product_lines::count_for_contact(&pool, contact_id).await.unwrap(),
        1
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}
