mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn bootstrap_is_empty_for_a_fresh_user() -> Result<()> {
    let app = common::test_app().await;
    let token = common::register(&app, "alice").await;

    let (status, body) = common::request(&app, Method::GET, "/bootstrap", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["user"]["username"], "alice");
    assert_eq!(data["categories"].as_array().map(Vec::len), Some(0));
    assert_eq!(data["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(data["stats"]["totalCategories"], 0);
    assert_eq!(data["stats"]["totalItems"], 0);
    assert_eq!(data["stats"]["totalValue"], 0.0);
    assert_eq!(data["stats"]["activeCategories"], 0);
    Ok(())
}

#[tokio::test]
async fn stats_match_the_per_resource_endpoints() -> Result<()> {
    let app = common::test_app().await;
    let token = common::register(&app, "alice").await;

    let fruit = common::create_category(&app, &token, "Fruit").await;
    let veggies = common::create_category(&app, &token, "Veggies").await;
    let fruit_id = fruit["id"].as_str().unwrap().to_string();
    let veggies_id = veggies["id"].as_str().unwrap().to_string();

    common::create_item(&app, &token, "Apple", &fruit_id, 3, 2.0).await;
    common::create_item(&app, &token, "Pear", &fruit_id, 2, 1.5).await;
    common::create_item(&app, &token, "Carrot", &veggies_id, 10, 0.2).await;

    let (status, body) = common::request(&app, Method::GET, "/bootstrap", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];

    let stats = &data["stats"];
    assert_eq!(stats["totalCategories"], 2);
    assert_eq!(stats["totalItems"], 3);
    // 3*2.0 + 2*1.5 + 10*0.2
    assert!((stats["totalValue"].as_f64().unwrap() - 11.0).abs() < 1e-9);
    assert_eq!(stats["activeCategories"], 2);

    // Counts in the composite view agree with /categories
    let categories = data["categories"].as_array().unwrap();
    assert_eq!(categories[0]["name"], "Fruit");
    assert_eq!(categories[0]["itemCount"], 2);
    assert_eq!(categories[1]["name"], "Veggies");
    assert_eq!(categories[1]["itemCount"], 1);

    let (_, listed) = common::request(&app, Method::GET, "/categories", Some(&token), None).await;
    assert_eq!(listed["data"], data["categories"]);

    // Items carry the category join and come back newest first
    let items = data["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i["categoryName"].is_string()));
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Carrot", "Pear", "Apple"]);

    // While /items stays name-ordered
    let (_, listed) = common::request(&app, Method::GET, "/items", Some(&token), None).await;
    let listed_names: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(listed_names, vec!["Apple", "Carrot", "Pear"]);
    Ok(())
}

#[tokio::test]
async fn bootstrap_never_mixes_owners() -> Result<()> {
    let app = common::test_app().await;
    let alice = common::register(&app, "alice").await;
    let bob = common::register(&app, "bob").await;

    let category = common::create_category(&app, &alice, "Fruit").await;
    let category_id = category["id"].as_str().unwrap().to_string();
    common::create_item(&app, &alice, "Apple", &category_id, 3, 2.0).await;

    let (status, body) = common::request(&app, Method::GET, "/bootstrap", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    Ok(())
}

/// The end-to-end scenario: register, one category with one item, bootstrap
/// reflects it, delete is blocked until the item goes.
#[tokio::test]
async fn register_stock_and_teardown_flow() -> Result<()> {
    let app = common::test_app().await;
    let token = common::register(&app, "alice").await;

    let fruit = common::create_category(&app, &token, "Fruit").await;
    assert_eq!(fruit["color"], "#FFFFFF");
    let fruit_id = fruit["id"].as_str().unwrap().to_string();

    let apple = common::create_item(&app, &token, "Apple", &fruit_id, 3, 2.0).await;
    let apple_id = apple["id"].as_str().unwrap().to_string();

    let (_, body) = common::request(&app, Method::GET, "/bootstrap", Some(&token), None).await;
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalItems"], 1);
    assert!((stats["totalValue"].as_f64().unwrap() - 6.0).abs() < 1e-9);
    assert_eq!(body["data"]["categories"][0]["itemCount"], 1);

    let (status, _) = common::request(
        &app,
        Method::DELETE,
        &format!("/categories/{}", fruit_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::request(
        &app,
        Method::DELETE,
        &format!("/items/{}", apple_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &app,
        Method::DELETE,
        &format!("/categories/{}", fruit_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
