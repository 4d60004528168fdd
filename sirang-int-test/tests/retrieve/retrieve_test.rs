use sirang::common::Value;
use sirang::doc;
use sirang::filter::{all, field};
use sirang::StoreOptions;
use sirang_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_retrieve_by_equality() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            logger.store(ctx.db_name(), "c", doc! { test: "x", unique: 1 }, StoreOptions::new())?;
            logger.store(ctx.db_name(), "c", doc! { test: "x", unique: 2 }, StoreOptions::new())?;

            let both = logger.retrieve(ctx.db_name(), "c", doc! { test: "x" })?;
            assert_eq!(both.len(), 2);

            let one = logger.retrieve(ctx.db_name(), "c", doc! { test: "x", unique: 1 })?;
            assert_eq!(one.len(), 1);
            assert_eq!(one[0].get("unique"), Value::from(1));

            let fluent = field("test").eq("x").and(field("unique").eq(2));
            let other = logger.retrieve(ctx.db_name(), "c", fluent)?;
            assert_eq!(other.len(), 1);
            assert_eq!(other[0].get("unique"), Value::from(2));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_retrieve_no_match_is_empty() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            assert!(logger.retrieve(ctx.db_name(), "missing", all())?.is_empty());

            logger.store(ctx.db_name(), "c", doc! { test: "x" }, StoreOptions::new())?;
            assert!(logger.retrieve(ctx.db_name(), "c", doc! { test: "y" })?.is_empty());
            assert!(logger.retrieve_one(ctx.db_name(), "c", doc! { test: "y" })?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_retrieve_round_trips_nested_values() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let raw = doc! {
                "_id": "nested",
                tags: ["cauchy", "mean"],
                solver: { name: "nelder-mead", tol: 0.000001 },
                converged: true,
                note: ()
            };
            logger.store(ctx.db_name(), "c", raw.clone(), StoreOptions::new())?;

            let stored = logger
                .retrieve_one(ctx.db_name(), "c", doc! { "_id": "nested" })?
                .expect("document should be stored");
            assert_eq!(stored, raw);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collection_doc_count() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "c")?, 0);
            for unique in 0..3 {
                logger.store(ctx.db_name(), "c", doc! { unique: unique }, StoreOptions::new())?;
            }
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "c")?, 3);
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "other")?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_db_returns_same_handle() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let first = logger.get_db(ctx.db_name())?;
            let second = logger.get_db(ctx.db_name())?;
            assert!(first.same_handle(&second));
            assert_eq!(first.name(), ctx.db_name());
            Ok(())
        },
        cleanup,
    )
}
