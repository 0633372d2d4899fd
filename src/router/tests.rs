use super::{RouteConfig, RouteEntry, Router, Routes, TagSpec};
use crate::error::Error;
use crate::typed::HandlerRef;
use http::Method;

async fn list() -> anyhow::Result<()> {
    Ok(())
}

async fn create() -> anyhow::Result<()> {
    Ok(())
}

fn paths(router: &Router, root: &str) -> Vec<(String, Method)> {
    router
        .get_routes(root)
        .map(|e| (e.path, e.method))
        .collect()
}

#[test]
fn test_own_routes_keep_registration_order() {
    let mut r = Router::new("/items");
    r.get("", RouteConfig::new(), list).unwrap();
    r.post("", RouteConfig::new(), create).unwrap();
    r.get("/archived", RouteConfig::new(), list).unwrap();

    assert_eq!(
        paths(&r, "/api"),
        vec![
            ("/api/items".to_string(), Method::GET),
            ("/api/items".to_string(), Method::POST),
            ("/api/items/archived".to_string(), Method::GET),
        ]
    );
}

#[test]
fn test_reregistration_overwrites_in_place() {
    let mut r = Router::default();
    r.get("/a", RouteConfig::new(), list).unwrap();
    r.get("/a", RouteConfig::new().status(202), create).unwrap();

    let entries: Vec<RouteEntry> = r.get_routes("").collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].handler, HandlerRef::new(create));
    assert_eq!(entries[0].config.status, Some(202));
}

#[test]
fn test_nested_routes_accumulate_prefixes() {
    let mut inner = Router::new("/admin");
    inner.post("/users", RouteConfig::new(), create).unwrap();

    let mut outer = Router::new("/v1");
    outer.get("/items", RouteConfig::new(), list).unwrap();
    outer.add_router(inner).unwrap();

    assert_eq!(
        paths(&outer, "/api"),
        vec![
            ("/api/v1/items".to_string(), Method::GET),
            ("/api/v1/admin/users".to_string(), Method::POST),
        ]
    );
}

#[test]
fn test_composition_is_associative_with_prefixing() {
    let mut b = Router::new("/b");
    b.get("/x", RouteConfig::new(), list).unwrap();

    let mut a = Router::default();
    a.add_router(b.clone()).unwrap();

    assert_eq!(paths(&a, "/p"), paths(&b, "/p"));
}

#[test]
fn test_get_routes_is_restartable() {
    let mut r = Router::new("/r");
    r.get("/one", RouteConfig::new(), list).unwrap();
    assert_eq!(paths(&r, ""), paths(&r, ""));
}

#[test]
fn test_router_cannot_contain_itself() {
    let mut r = Router::new("/self");
    let copy = r.clone();
    assert!(matches!(r.add_router(copy), Err(Error::SelfComposition)));
}

#[test]
fn test_cycle_is_rejected_at_insertion() {
    let a = Router::new("/a");
    let mut b = Router::new("/b");
    b.add_router(a.clone()).unwrap();

    let mut a = a;
    let err = a.add_router(b).unwrap_err();
    assert!(matches!(err, Error::CyclicComposition { ref base } if base == "/b"));
}

#[test]
fn test_adding_same_router_twice_keeps_one_copy() {
    let mut child = Router::new("/c");
    child.get("/x", RouteConfig::new(), list).unwrap();

    let mut parent = Router::default();
    parent.add_router(child.clone()).unwrap();
    parent.add_router(child).unwrap();

    assert_eq!(parent.get_routes("").count(), 1);
}

#[test]
fn test_router_tags_apply_to_unspecified_routes() {
    let mut r = Router::new("/t").with_tags(["pets"]);
    r.get("/inherit", RouteConfig::new(), list).unwrap();
    r.get("/own", RouteConfig::new().tags(["mine"]), list).unwrap();
    r.get("/none", RouteConfig::new().no_tags(), list).unwrap();

    let tags: Vec<TagSpec> = r.get_routes("").map(|e| e.config.tags).collect();
    assert_eq!(
        tags,
        vec![
            TagSpec::Explicit(vec!["pets".into()]),
            TagSpec::Explicit(vec!["mine".into()]),
            TagSpec::Suppress,
        ]
    );
}

#[test]
fn test_nested_router_inherits_parent_tags() {
    let mut inner = Router::new("/in");
    inner.get("/x", RouteConfig::new(), list).unwrap();
    let mut outer = Router::new("/out").with_tags(["outer"]);
    outer.add_router(inner).unwrap();

    let entry = outer.get_routes("").next().unwrap();
    assert_eq!(entry.config.tags, TagSpec::Explicit(vec!["outer".into()]));
}

#[test]
fn test_untagged_router_leaves_tags_unspecified() {
    let mut r = Router::default();
    r.get("/x", RouteConfig::new(), list).unwrap();
    let entry = r.get_routes("").next().unwrap();
    assert_eq!(entry.config.tags, TagSpec::Inherit);
}
