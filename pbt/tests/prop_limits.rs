//! DeserializerLimits のプロパティテスト

use http11_deserializer::{DeserializerLimits, Method, RequestDeserializer, Status, Version};
use pbt::{feed_all, split_at_points, split_points};
use proptest::prelude::*;

#[test]
fn deserializer_limits_default_values() {
    let limits = DeserializerLimits::default();

    assert_eq!(limits.max_target_size, 8000);
    assert_eq!(limits.max_fields_size, 80 * 1024); // 80KB
    assert_eq!(limits.max_body_size, 10 * 1024 * 1024); // 10MB
    assert_eq!(limits.max_chunk_line_size, 64);
}

#[test]
fn deserializer_limits_unlimited_values() {
    let limits = DeserializerLimits::unlimited();

    assert_eq!(limits.max_target_size, usize::MAX);
    assert_eq!(limits.max_fields_size, usize::MAX);
    assert_eq!(limits.max_body_size, usize::MAX);
    assert_eq!(limits.max_chunk_line_size, usize::MAX);
}

#[test]
fn method_and_version_bounds() {
    assert_eq!(Method::MAX_LEN, "CONNECT".len());
    assert_eq!(Version::MAX_LEN, "HTTP/1.1".len());
}

proptest! {
    // ターゲット長が制限以下なら受け付け、超えたら 414
    #[test]
    fn target_limit(
        max_target_size in 1usize..256,
        target_len in 1usize..512,
        points in split_points(),
    ) {
        let limits = DeserializerLimits { max_target_size, ..Default::default() };
        let input = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(target_len - 1));
        let results = feed_all(
            &mut RequestDeserializer::with_limits(limits),
            split_at_points(input.as_bytes(), &points),
        );

        prop_assert_eq!(results.len(), 1);
        if target_len <= max_target_size {
            prop_assert_eq!(results[0].as_ref().unwrap().target.len(), target_len);
        } else {
            prop_assert_eq!(results[0].as_ref().err(), Some(&Status::UriTooLong));
        }
    }

    // フィールドセクションは累計で制限される
    #[test]
    fn fields_limit(
        max_fields_size in 0usize..512,
        count in 0usize..32,
        value_len in 0usize..32,
        points in split_points(),
    ) {
        let limits = DeserializerLimits { max_fields_size, ..Default::default() };
        let mut input = String::from("GET / HTTP/1.1\r\n");
        let mut total = 0;
        for i in 0..count {
            let line = format!("X-{:02}: {}\r\n", i, "v".repeat(value_len));
            total += line.len();
            input.push_str(&line);
        }
        input.push_str("\r\n");

        let results = feed_all(
            &mut RequestDeserializer::with_limits(limits),
            split_at_points(input.as_bytes(), &points),
        );

        prop_assert_eq!(results.len(), 1);
        if total <= max_fields_size {
            prop_assert_eq!(results[0].as_ref().unwrap().fields.len(), count);
        } else {
            prop_assert_eq!(results[0].as_ref().err(), Some(&Status::ContentTooLarge));
        }
    }

    // Content-Length が制限を超えたらボディを待たずに 413
    #[test]
    fn body_limit(max_body_size in 0usize..1024, content_length in 0usize..2048) {
        let limits = DeserializerLimits { max_body_size, ..Default::default() };
        let head = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", content_length);
        let mut deserializer = RequestDeserializer::with_limits(limits);
        deserializer.read(head.as_bytes());

        if content_length > max_body_size {
            prop_assert_eq!(deserializer.next().err(), Some(Status::ContentTooLarge));
        } else {
            deserializer.read(&vec![b'x'; content_length]);
            prop_assert_eq!(deserializer.next().unwrap().body.len(), content_length);
        }
    }

    // Clone のプロパティ: クローンが元と等しい
    #[test]
    fn deserializer_limits_clone_eq(
        max_target_size in 1usize..100_000,
        max_fields_size in 1usize..1_000_000,
        max_body_size in 1usize..100_000_000,
        max_chunk_line_size in 1usize..1000,
    ) {
        let limits = DeserializerLimits {
            max_target_size,
            max_fields_size,
            max_body_size,
            max_chunk_line_size,
        };
        prop_assert_eq!(limits.clone(), limits);
    }
}
