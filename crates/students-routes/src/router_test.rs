//! Tests for address routing and query translation

#[cfg(test)]
mod router_tests {
    use crate::template::{ResourceKind, ResourceTemplate};
    use crate::test_utils::{address, students_router, AUTHORITY, ID_COLUMN, TABLE};
    use std::sync::Arc;
    use students_query::{ProviderError, QueryDescriptor, QueryRequest, ResourceAddress};

    #[test]
    fn test_collection_address_matches_collection() {
        let router = students_router();

        let matched = router.match_address(&address(&["students"]));
        assert_eq!(matched.kind, ResourceKind::Collection);
        assert!(matched.extracted_identifier.is_none());
    }

    #[test]
    fn test_item_address_extracts_identifier() {
        let router = students_router();

        for id in ["147221", "0", "A-17", "ana maria"] {
            let matched = router.match_address(&address(&["students", id]));
            assert_eq!(matched.kind, ResourceKind::SingleItem);
            assert_eq!(matched.extracted_identifier.as_deref(), Some(id));
        }
    }

    #[test]
    fn test_wrong_depth_is_unmatched() {
        let router = students_router();

        assert!(router.match_address(&address(&[])).is_unmatched());
        assert!(router
            .match_address(&address(&["students", "1", "grades"]))
            .is_unmatched());
        assert!(router.match_address(&address(&["unknown"])).is_unmatched());
        assert!(router
            .match_address(&ResourceAddress::from_slice("org.other", &["students"]))
            .is_unmatched());
    }

    #[test]
    fn test_match_is_idempotent() {
        let router = students_router();
        let item = address(&["students", "147221"]);

        let first = router.match_address(&item);
        let second = router.match_address(&item);
        assert_eq!(first, second);
    }

    #[test]
    fn test_collection_without_filter() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();

        let descriptor = router.resolve(&address(&["students"]), QueryRequest::new())?;
        assert_eq!(descriptor, QueryDescriptor::table(TABLE));
        assert!(descriptor.filter_predicate.is_none());
        assert!(descriptor.filter_arguments.is_none());

        Ok(())
    }

    #[test]
    fn test_collection_passes_filter_through() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();
        let request = QueryRequest::new()
            .with_projection(["nombre"])
            .with_filter("puntos_extra > ? AND nombre <> ?", ["2", "Ana"])
            .with_sort_order("nombre DESC");

        let descriptor = router.resolve(&address(&["students"]), request)?;
        assert_eq!(descriptor.table_name, TABLE);
        assert_eq!(descriptor.projection, Some(vec!["nombre".to_string()]));
        assert_eq!(
            descriptor.filter_predicate.as_deref(),
            Some("puntos_extra > ? AND nombre <> ?")
        );
        assert_eq!(descriptor.arguments(), &["2".to_string(), "Ana".to_string()]);
        assert_eq!(descriptor.sort_order.as_deref(), Some("nombre DESC"));

        Ok(())
    }

    #[test]
    fn test_collection_does_not_check_argument_count() -> Result<(), Box<dyn std::error::Error>>
    {
        let router = students_router();
        let request = QueryRequest::new().with_filter("nombre = ? AND puntos_extra = ?", ["Ana"]);

        let descriptor = router.resolve(&address(&["students"]), request)?;
        assert_eq!(descriptor.arguments().len(), 1);

        Ok(())
    }

    #[test]
    fn test_item_filters_on_identity_column() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();

        let descriptor = router.resolve(&address(&["students", "147221"]), QueryRequest::new())?;
        assert_eq!(descriptor.table_name, TABLE);
        assert_eq!(
            descriptor.filter_predicate,
            Some(format!("{} = ?", ID_COLUMN))
        );
        assert_eq!(descriptor.filter_arguments, Some(vec!["147221".to_string()]));

        Ok(())
    }

    #[test]
    fn test_item_discards_caller_filter() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();
        let item = address(&["students", "147221"]);

        let plain = router.resolve(&item, QueryRequest::new())?;
        let filtered = router.resolve(
            &item,
            QueryRequest::new().with_filter("nombre = ?", ["X"]),
        )?;
        assert_eq!(plain, filtered);

        let predicate_only =
            router.resolve(&item, QueryRequest::new().with_filter_predicate("1 = 0"))?;
        assert_eq!(plain, predicate_only);

        Ok(())
    }

    #[test]
    fn test_item_keeps_projection_and_sort() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();
        let request = QueryRequest::new()
            .with_projection(["nombre", "puntos_extra"])
            .with_sort_order("nombre");

        let descriptor = router.resolve(&address(&["students", "9"]), request)?;
        assert_eq!(
            descriptor.projection,
            Some(vec!["nombre".to_string(), "puntos_extra".to_string()])
        );
        assert_eq!(descriptor.sort_order.as_deref(), Some("nombre"));

        Ok(())
    }

    #[test]
    fn test_unknown_address_is_routing_error() {
        let router = students_router();

        let err = router
            .resolve(&address(&["unknown"]), QueryRequest::new().with_filter("x = ?", ["1"]))
            .unwrap_err();

        match err {
            ProviderError::Routing { address, .. } => {
                assert_eq!(address, Some(format!("content://{}/unknown", AUTHORITY)));
            }
            other => panic!("expected routing error, got {:?}", other),
        }
    }

    #[test]
    fn test_first_registered_template_wins() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();

        // Shadowed by the earlier `students/*`
        router.registry().register(ResourceTemplate::item(
            AUTHORITY,
            "students/#",
            "student_archive",
            "num_control",
        ))?;

        let descriptor = router.resolve(&address(&["students", "42"]), QueryRequest::new())?;
        assert_eq!(descriptor.table_name, TABLE);

        Ok(())
    }

    #[test]
    fn test_runtime_registration_is_visible() -> Result<(), Box<dyn std::error::Error>> {
        let router = students_router();
        let courses = address(&["courses"]);
        assert!(router.match_address(&courses).is_unmatched());

        router.registry().register(ResourceTemplate::collection(
            AUTHORITY, "courses", "course", "clave",
        ))?;

        let descriptor = router.resolve(&courses, QueryRequest::new())?;
        assert_eq!(descriptor.table_name, "course");

        Ok(())
    }

    #[test]
    fn test_concurrent_matching() {
        let router = Arc::new(students_router());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let router = router.clone();
                std::thread::spawn(move || {
                    let id = i.to_string();
                    for _ in 0..100 {
                        let matched = router.match_address(&address(&["students", id.as_str()]));
                        assert_eq!(matched.extracted_identifier.as_deref(), Some(id.as_str()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
