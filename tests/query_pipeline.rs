//! Query pipeline ordering: filter, then sort, then paginate, with the
//! total counted before pagination.

use scim_store::{
    AttributeDefinition, InMemoryStore, Resource, ResourceStore, ResourceType, Schema,
    SearchRequest, SortOrder,
};
use serde_json::json;

const USER_SCHEMA: &str = "urn:example:params:scim:schemas:core:2.0:User";
const GROUP_SCHEMA: &str = "urn:example:params:scim:schemas:core:2.0:Group";

fn store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .register_schema(Schema {
            id: USER_SCHEMA.into(),
            name: "User".into(),
            description: String::new(),
            attributes: vec![
                AttributeDefinition {
                    name: "userName".into(),
                    required: true,
                    ..AttributeDefinition::default()
                },
                AttributeDefinition {
                    name: "rank".into(),
                    data_type: scim_store::AttributeType::Integer,
                    ..AttributeDefinition::default()
                },
            ],
        })
        .unwrap();
    store
        .register_resource_type(ResourceType {
            id: "User".into(),
            name: "User".into(),
            description: String::new(),
            endpoint: "/Users".into(),
            schema: USER_SCHEMA.into(),
            schema_extensions: vec![],
        })
        .unwrap();
    store
        .register_schema(Schema {
            id: GROUP_SCHEMA.into(),
            name: "Group".into(),
            description: String::new(),
            attributes: vec![AttributeDefinition::string("displayName")],
        })
        .unwrap();
    store
        .register_resource_type(ResourceType {
            id: "Group".into(),
            name: "Group".into(),
            description: String::new(),
            endpoint: "/Groups".into(),
            schema: GROUP_SCHEMA.into(),
            schema_extensions: vec![],
        })
        .unwrap();
    store
}

fn seed_users(store: &InMemoryStore, ranks: &[Option<i64>]) {
    for (index, rank) in ranks.iter().enumerate() {
        let mut data = json!({"userName": format!("user{index}")});
        if let Some(rank) = rank {
            data["rank"] = json!(rank);
        }
        store
            .create("", "User", Resource::new("User", data).unwrap())
            .unwrap();
    }
}

fn user_names(resources: &[Resource]) -> Vec<&str> {
    resources
        .iter()
        .map(|r| r.attribute("userName").and_then(|v| v.as_str()).unwrap())
        .collect()
}

#[test]
fn test_ascending_sort_puts_missing_keys_last() {
    let store = store();
    seed_users(&store, &[Some(3), None, Some(1), None, Some(2)]);

    let request = SearchRequest::new().with_sort_by("rank");
    let page = store.query("", &request, Some("User")).unwrap();
    assert_eq!(
        user_names(&page.resources),
        vec!["user2", "user4", "user0", "user1", "user3"]
    );
}

#[test]
fn test_descending_sort_mirrors_ascending() {
    let store = store();
    seed_users(&store, &[Some(3), None, Some(1), None, Some(2)]);

    let request = SearchRequest::new()
        .with_sort_by("rank")
        .with_sort_order(SortOrder::Descending);
    let page = store.query("", &request, Some("User")).unwrap();
    assert_eq!(
        user_names(&page.resources),
        vec!["user1", "user3", "user0", "user4", "user2"]
    );
}

#[test]
fn test_equal_sort_keys_keep_insertion_order() {
    let store = store();
    seed_users(&store, &[Some(1), Some(1), Some(1)]);

    let request = SearchRequest::new().with_sort_by("rank");
    let page = store.query("", &request, Some("User")).unwrap();
    assert_eq!(user_names(&page.resources), vec!["user0", "user1", "user2"]);
}

#[test]
fn test_total_counts_before_pagination() {
    let store = store();
    seed_users(&store, &[Some(5), Some(4), Some(3), Some(2), Some(1)]);

    let request = SearchRequest::new()
        .with_sort_by("rank")
        .with_start_index(2)
        .with_count(2);
    let page = store.query("", &request, Some("User")).unwrap();
    assert_eq!(page.total_results, 5);
    assert_eq!(user_names(&page.resources), vec!["user3", "user2"]);
}

#[test]
fn test_pagination_edges() {
    let store = store();
    seed_users(&store, &[Some(1), Some(2), Some(3)]);
    let base = SearchRequest::new().with_sort_by("rank");

    // start index past the end yields an empty page with the full total
    let page = store
        .query("", &base.clone().with_start_index(10), Some("User"))
        .unwrap();
    assert_eq!(page.total_results, 3);
    assert!(page.resources.is_empty());

    // start index zero clamps to the first record
    let page = store
        .query("", &base.clone().with_start_index(0), Some("User"))
        .unwrap();
    assert_eq!(page.resources.len(), 3);

    // count zero returns the total with no records
    let page = store
        .query("", &base.with_count(0), Some("User"))
        .unwrap();
    assert_eq!(page.total_results, 3);
    assert!(page.resources.is_empty());
}

#[test]
fn test_filter_applies_before_counting() {
    let store = store();
    seed_users(&store, &[Some(1), Some(2), Some(3), Some(4)]);

    let request = SearchRequest::new()
        .with_filter("rank gt 1")
        .with_count(1);
    let page = store.query("", &request, Some("User")).unwrap();
    assert_eq!(page.total_results, 3);
    assert_eq!(page.resources.len(), 1);
}

#[test]
fn test_unscoped_query_spans_resource_types() {
    let store = store();
    seed_users(&store, &[Some(1)]);
    store
        .create(
            "",
            "Group",
            Resource::new("Group", json!({"displayName": "admins"})).unwrap(),
        )
        .unwrap();

    let page = store.query("", &SearchRequest::new(), None).unwrap();
    assert_eq!(page.total_results, 2);

    let page = store.query("", &SearchRequest::new(), Some("Group")).unwrap();
    assert_eq!(page.total_results, 1);
}
