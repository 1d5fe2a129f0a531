use shared::{
    domain::{Item, ItemId},
    protocol::MergeAction,
    view,
};
use storage::{ItemStore, StoreError};

#[tokio::test]
async fn bolt_lifecycle_acceptance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ItemStore::open_file(dir.path().join("data").join("inventario.json"));
    assert!(store.load().await.is_empty());

    let (action, created) = store
        .create_or_merge(Item::new(ItemId(1), "bolt", 10.0))
        .await
        .expect("create");
    assert_eq!(action, MergeAction::Created);
    assert_eq!(created.quantity, 10.0);

    let (action, merged) = store
        .create_or_merge(Item::new(ItemId(1), "bolt", 5.0))
        .await
        .expect("merge");
    assert_eq!(action, MergeAction::Merged);
    assert_eq!(merged.quantity, 15.0);

    let removed = store.remove(ItemId(1)).await.expect("remove");
    assert_eq!(removed.quantity, 15.0);
    assert!(store.load().await.is_empty());

    let err = store.remove(ItemId(1)).await.expect_err("already removed");
    assert!(matches!(err, StoreError::NotFound(ItemId(1))));
}

#[tokio::test]
async fn reopened_store_sees_persisted_collection_and_kpis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("inventario.json");

    {
        let store = ItemStore::open_file(&path);
        store
            .create_or_merge(Item::new(ItemId(1), "Bolt", 10.0).with_price(0.5))
            .await
            .expect("bolt");
        store
            .create_or_merge(Item::new(ItemId(2), "Nut", 4.0).with_category("hardware"))
            .await
            .expect("nut");
    }

    let reopened = ItemStore::open_file(&path);
    let items = reopened.load().await;
    assert_eq!(items.len(), 2);

    let visible = view::filter(&items, "bo");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Bolt");

    let kpis = view::aggregate(&items);
    assert_eq!(kpis.count, 2);
    assert_eq!(kpis.total_quantity, 14.0);
    assert_eq!(kpis.total_value, 5.0);
}
