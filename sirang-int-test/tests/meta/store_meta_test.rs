use chrono::NaiveDateTime;
use sirang::common::{Value, EXE_DATE, EXE_DATE_FORMAT, GIT_COMMIT};
use sirang::doc;
use sirang::errors::ErrorKind;
use sirang::filter::by_id;
use sirang::provenance::GitDescribe;
use sirang_int_test::test_util::{
    cleanup, create_sibling_logger, create_test_context, run_test, TEST_REVISION,
};

#[test]
fn test_store_meta_explicit_then_counted_id() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let id = logger.store_meta(ctx.db_name(), "meta", Some(doc! {}), Some(Value::from(1)))?;
            assert_eq!(id, "1");
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "meta")?, 1);

            let id = logger.store_meta(ctx.db_name(), "meta", Some(doc! {}), None)?;
            assert_eq!(id, "2");
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "meta")?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_meta_records_provenance() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            logger.store_meta(ctx.db_name(), "meta", None, None)?;

            let meta = logger
                .retrieve_one(ctx.db_name(), "meta", by_id(1))?
                .expect("meta-record should be stored");
            assert_eq!(meta.get(GIT_COMMIT), Value::from(TEST_REVISION));

            let exe_date = meta.get(EXE_DATE);
            let exe_date = exe_date.as_string().expect("exe-date is a string");
            assert!(NaiveDateTime::parse_from_str(exe_date, EXE_DATE_FORMAT).is_ok());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_meta_keeps_caller_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = ctx.logger();
            let id = logger.store_meta(
                ctx.db_name(),
                "meta",
                Some(doc! { dataset: "cauchy", "num-of-samples": 1000 }),
                Some(Value::from("setup")),
            )?;
            assert_eq!(id, "setup");

            let meta = logger
                .retrieve_one(ctx.db_name(), "meta", by_id("setup"))?
                .expect("meta-record should be stored");
            assert_eq!(meta.get("dataset"), Value::from("cauchy"));
            assert_eq!(meta.get("num-of-samples"), Value::from(1000));
            assert!(meta.contains_key(EXE_DATE));
            assert!(meta.contains_key(GIT_COMMIT));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_meta_without_revision_stores_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let logger = create_sibling_logger(&ctx, |builder| {
                builder.revision_source(GitDescribe::new().with_program("sirang-no-such-git"))
            })?;
            let err = logger.store_meta(ctx.db_name(), "meta", None, None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ProvenanceUnavailable);
            assert_eq!(logger.collection_doc_count(ctx.db_name(), "meta")?, 0);
            Ok(())
        },
        cleanup,
    )
}
