//! RequestDeserializer のプロパティテスト

use http11_deserializer::{RequestDeserializer, Status};
use pbt::{
    RequestParts, feed_all, field_name, field_value, ows, request, split_at_points, split_points,
};
use proptest::prelude::*;

proptest! {
    // 1 回で渡しても分割して渡しても結果は同じ
    #[test]
    fn fragmentation_invariance(parts in request(), points in split_points()) {
        let input = parts.encode();

        let whole = feed_all(&mut RequestDeserializer::new(), [input.as_slice()]);
        prop_assert_eq!(whole.len(), 1);
        let request = whole[0].as_ref().unwrap();
        prop_assert!(parts.matches(request));

        let split = feed_all(&mut RequestDeserializer::new(), split_at_points(&input, &points));
        prop_assert_eq!(split, whole);
    }

    // 1 バイトずつ渡しても結果は同じ
    #[test]
    fn byte_by_byte(parts in request()) {
        let input = parts.encode();
        let results = feed_all(&mut RequestDeserializer::new(), input.chunks(1));
        prop_assert_eq!(results.len(), 1);
        prop_assert!(parts.matches(results[0].as_ref().unwrap()));
    }

    // 連結したリクエストは到着順に取り出せる
    #[test]
    fn pipelining(
        requests in proptest::collection::vec(request(), 1..5),
        points in split_points(),
    ) {
        let input: Vec<u8> = requests.iter().flat_map(RequestParts::encode).collect();
        let results = feed_all(&mut RequestDeserializer::new(), split_at_points(&input, &points));

        prop_assert_eq!(results.len(), requests.len());
        for (parts, result) in requests.iter().zip(&results) {
            prop_assert!(parts.matches(result.as_ref().unwrap()));
        }
    }

    // 1 回の read で届いたリクエストは追加の read なしで全部取り出せる
    #[test]
    fn pipelining_single_read(requests in proptest::collection::vec(request(), 1..5)) {
        let input: Vec<u8> = requests.iter().flat_map(RequestParts::encode).collect();
        let mut deserializer = RequestDeserializer::new();
        deserializer.read(&input);

        for parts in &requests {
            prop_assert!(deserializer.has_next());
            let request = deserializer.next().unwrap();
            prop_assert!(parts.matches(&request));
        }
        prop_assert!(!deserializer.has_next());
        prop_assert!(deserializer.is_idle());
    }

    // chunked でエンコードしても同じボディになる
    #[test]
    fn chunked_body(parts in request(), chunk_size in 1usize..64, points in split_points()) {
        let input = parts.encode_chunked(chunk_size);
        let mut deserializer = RequestDeserializer::new().accept_chunked(true);
        let results = feed_all(&mut deserializer, split_at_points(&input, &points));

        prop_assert_eq!(results.len(), 1);
        let request = results[0].as_ref().unwrap();
        prop_assert_eq!(&request.body, &parts.body);
        prop_assert!(request.trailers.is_empty());
    }

    // chunked は既定では拒否する
    #[test]
    fn chunked_rejected_by_default(parts in request(), chunk_size in 1usize..64) {
        let input = parts.encode_chunked(chunk_size);
        let results = feed_all(&mut RequestDeserializer::new(), [input.as_slice()]);
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].as_ref().err(), Some(&Status::BadRequest));
    }

    // 値の前後の OWS は取り除かれる
    #[test]
    fn field_value_ows(
        name in field_name(),
        value in field_value(),
        leading in ows(),
        trailing in ows(),
    ) {
        let input = format!("GET / HTTP/1.1\r\n{}:{}{}{}\r\n\r\n", name, leading, value, trailing);
        let results = feed_all(&mut RequestDeserializer::new(), [input.as_bytes()]);
        prop_assert_eq!(results.len(), 1);
        let request = results[0].as_ref().unwrap();
        prop_assert_eq!(request.field(&name), Some(value.as_str()));
    }

    // 同じ名前のフィールドは値に関係なく拒否する
    #[test]
    fn duplicate_field(name in field_name(), first in field_value(), second in field_value()) {
        let input = format!(
            "GET / HTTP/1.1\r\n{}: {}\r\n{}: {}\r\n\r\n",
            name, first, name, second
        );
        let results = feed_all(&mut RequestDeserializer::new(), [input.as_bytes()]);
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].as_ref().err(), Some(&Status::BadRequest));
    }

    // 任意のバイト列でもパニックせず、エラーは 1 回だけ返る
    #[test]
    fn arbitrary_bytes_never_panic(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        points in split_points(),
    ) {
        let mut deserializer = RequestDeserializer::new().accept_chunked(true);
        'feed: for chunk in split_at_points(&data, &points) {
            deserializer.read(chunk);
            while deserializer.has_next() {
                if let Err(status) = deserializer.next() {
                    prop_assert_ne!(status, Status::InternalServerError);
                    // 接続を閉じる前提なので、残りは破棄されている
                    prop_assert!(!deserializer.has_next());
                    prop_assert!(deserializer.is_idle());
                    break 'feed;
                }
            }
        }
    }

    // 空の read は状態を変えない
    #[test]
    fn empty_read_is_noop(parts in request(), cut in any::<prop::sample::Index>()) {
        let input = parts.encode();
        let (head, tail) = input.split_at(cut.index(input.len()));

        let mut deserializer = RequestDeserializer::new();
        deserializer.read(head);
        let buffered = deserializer.buffered();
        let has_next = deserializer.has_next();

        deserializer.read(&[]);
        prop_assert_eq!(deserializer.buffered(), buffered);
        prop_assert_eq!(deserializer.has_next(), has_next);

        deserializer.read(tail);
        prop_assert!(deserializer.has_next());
        prop_assert!(parts.matches(&deserializer.next().unwrap()));
    }
}
