use sirang::common::{Value, DOC_ID};
use sirang::doc;
use sirang::errors::ErrorKind;
use sirang::filter::{all, by_id};
use sirang::StoreOptions;
use sirang_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_store_explicit_zero_id() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let id = logger.store(ctx.db_name(), "c", doc! { "_id": 0 }, StoreOptions::new())?;
            assert_eq!(id, "0");

            let found = logger.retrieve(ctx.db_name(), "c", doc! { "_id": 0 })?;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0], doc! { "_id": 0 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_generates_id() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let raw = doc! { lr: 0.01, epochs: 20, optimizer: "adam" };
            let id = logger.store(ctx.db_name(), "runs", raw.clone(), StoreOptions::new())?;
            assert!(!id.is_empty());

            let found = logger.retrieve(ctx.db_name(), "runs", all())?;
            assert_eq!(found.len(), 1);
            let stored = &found[0];
            assert_eq!(stored.id().map(|v| v.to_id_string()), Some(id));
            assert_eq!(stored.get("lr"), Value::F64(0.01));
            assert_eq!(stored.get("epochs"), Value::I64(20));
            assert_eq!(stored.get("optimizer"), Value::from("adam"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_keeps_listed_keys() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let raw = doc! { a: 0, b: 1, c: 2, d: 3 };
            let id = logger.store(
                ctx.db_name(),
                "c",
                raw,
                StoreOptions::new().keep(["a", "b"]).doc_id("kept"),
            )?;
            assert_eq!(id, "kept");

            let stored = logger
                .retrieve_one(ctx.db_name(), "c", by_id("kept"))?
                .expect("document should be stored");
            assert_eq!(stored, doc! { "_id": "kept", a: 0, b: 1 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_inverted_keep_drops_listed_keys() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let raw = doc! { a: 0, b: 1, c: 2, d: 3 };
            logger.store(
                ctx.db_name(),
                "c",
                raw,
                StoreOptions::new().keep(["a", "b"]).inversion(true).doc_id(7),
            )?;

            let stored = logger
                .retrieve_one(ctx.db_name(), "c", by_id(7))?
                .expect("document should be stored");
            assert_eq!(stored, doc! { "_id": 7, c: 2, d: 3 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_kept_and_dropped_fields_partition_input() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let raw = doc! { alpha: 0.5, beta: [1, 2], gamma: { depth: 3 }, delta: "x" };
            let keep = ["alpha", "gamma"];

            logger.store(
                ctx.db_name(),
                "c",
                raw.clone(),
                StoreOptions::new().keep(keep).doc_id("kept"),
            )?;
            logger.store(
                ctx.db_name(),
                "c",
                raw.clone(),
                StoreOptions::new().keep(keep).inversion(true).doc_id("dropped"),
            )?;

            let mut kept = logger
                .retrieve_one(ctx.db_name(), "c", by_id("kept"))?
                .expect("kept half stored");
            let mut dropped = logger
                .retrieve_one(ctx.db_name(), "c", by_id("dropped"))?
                .expect("dropped half stored");
            kept.remove(DOC_ID);
            dropped.remove(DOC_ID);

            for (key, _) in kept.iter() {
                assert!(!dropped.contains_key(key));
            }
            let mut union = kept.clone();
            union.merge(&dropped);
            assert_eq!(union, raw);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_empty_keep_stores_only_id() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let id = logger.store(
                ctx.db_name(),
                "c",
                doc! { a: 1, b: 2 },
                StoreOptions::new().keep(Vec::<String>::new()),
            )?;

            let found = logger.retrieve(ctx.db_name(), "c", all())?;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].size(), 1);
            assert_eq!(found[0].id().map(|v| v.to_id_string()), Some(id));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_doc_id_overrides_raw_id() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let id = logger.store(
                ctx.db_name(),
                "c",
                doc! { "_id": "from-raw", x: 1 },
                StoreOptions::new().doc_id("explicit"),
            )?;
            assert_eq!(id, "explicit");
            assert!(logger.retrieve(ctx.db_name(), "c", by_id("from-raw"))?.is_empty());
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "c")?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_duplicate_id_is_collision() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            logger.store(ctx.db_name(), "c", doc! { "_id": "dup" }, StoreOptions::new())?;
            let err = logger
                .store(ctx.db_name(), "c", doc! { "_id": "dup", x: 1 }, StoreOptions::new())
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IdCollision);
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "c")?, 1);
            Ok(())
        },
        cleanup,
    )
}
