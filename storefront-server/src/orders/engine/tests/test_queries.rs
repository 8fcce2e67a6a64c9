use super::*;

#[tokio::test]
async fn test_status_queries_partition_orders() {
    let env = setup().await;
    env.add_product("Mouse", 10, 10.0).await;
    let placed = env.place(&[("Mouse", 1)]).await;
    let received = env.place(&[("Mouse", 2)]).await;
    env.engine.receive(&received.id).await.unwrap();

    let undelivered = env.engine.undelivered().await.unwrap();
    assert_eq!(undelivered.len(), 1);
    assert_eq!(undelivered[0].id, placed.id);

    let done = env.engine.received().await.unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, received.id);

    assert_eq!(env.engine.for_user(env.user_id).await.unwrap().len(), 2);

    let history = env.engine.history(env.user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, received.id);

    assert!(env.engine.for_user(env.user_id + 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_does_not_restore_stock() {
    let env = setup().await;
    env.add_product("Mouse", 5, 10.0).await;
    let order = env.place(&[("Mouse", 2)]).await;

    env.engine.cancel(&order.id).await.unwrap();

    assert_eq!(env.stock("Mouse").await, Some(5));
    assert_eq!(env.order_count().await, 0);
    assert!(matches!(
        env.engine.cancel(&order.id).await,
        Err(OrderError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_top_selling_sums_across_orders() {
    let env = setup().await;
    env.add_product("Widget", 100, 4.0).await;
    env.add_product("Gadget", 100, 9.0).await;
    env.place(&[("Widget", 2)]).await;
    env.place(&[("Gadget", 1), ("Widget", 3)]).await;

    let top = env.engine.top_selling().await.unwrap();

    assert_eq!(top[0].product_name, "Widget");
    assert_eq!(top[0].total_sold, 5);
    assert_eq!(top[1].product_name, "Gadget");
    assert_eq!(top[1].total_sold, 1);
}

#[tokio::test]
async fn test_top_selling_is_capped() {
    let env = setup().await;
    for (i, title) in ["P1", "P2", "P3", "P4", "P5", "P6"].iter().enumerate() {
        env.add_product(title, 100, 1.0).await;
        env.place(&[(*title, i as i64 + 1)]).await;
    }

    let top = env.engine.top_selling().await.unwrap();
    assert_eq!(top.len(), crate::orders::reports::TOP_SELLING_LIMIT);
    assert_eq!(top[0].product_name, "P6");
    assert!(top.iter().all(|p| p.product_name != "P1"));
}

#[tokio::test]
async fn test_monthly_sales_uses_current_price() {
    let env = setup().await;
    let widget = env.add_product("Widget", 100, 2.5).await;
    env.add_product("Gadget", 100, 10.0).await;
    env.place(&[("Widget", 4), ("Gadget", 1)]).await;
    env.place(&[("Widget", 2)]).await;

    // price change after ordering is reflected in the report
    product::update(
        &env.db.pool,
        widget,
        shared::models::ProductUpdate {
            retail_price: Some(3.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let now = chrono::Utc::now();
    let period = crate::orders::ReportPeriod::parse(
        Some(&now.format("%m").to_string()),
        Some(&now.format("%Y").to_string()),
    )
    .unwrap();
    let rows = env.engine.monthly_sales(period).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_title, "Widget");
    assert_eq!(rows[0].quantity, 6);
    assert_eq!(rows[0].price, 3.0);
    assert_eq!(rows[0].total, 18.0);
    assert_eq!(rows[1].total, 10.0);
}

#[tokio::test]
async fn test_monthly_sales_excludes_other_months() {
    let env = setup().await;
    env.add_product("Widget", 100, 2.5).await;
    env.place(&[("Widget", 4)]).await;

    let period = crate::orders::ReportPeriod::parse(Some("1"), Some("2001")).unwrap();
    assert!(env.engine.monthly_sales(period).await.unwrap().is_empty());
}
