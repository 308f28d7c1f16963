//! # Result Decoding
//!
//! Turns the raw bytes captured from a transform into a typed [`Page`], and
//! picks the leading books out of it with an explicit bounds check.

use crate::errors::PipelineError;
use crate::types::{Book, Page};
use tracing::debug;

/// Parses transform output as a single JSON `Page` document.
pub fn decode_page(raw: &[u8]) -> Result<Page, PipelineError> {
    let page: Page = serde_json::from_slice(raw)?;
    debug!("Decoded {} books from {} bytes", page.books.len(), raw.len());
    Ok(page)
}

/// Keeps the first `count` books, failing if the page holds fewer.
pub fn select_leading(mut books: Vec<Book>, count: usize) -> Result<Vec<Book>, PipelineError> {
    if books.len() < count {
        return Err(PipelineError::NotEnoughBooks {
            needed: count,
            found: books.len(),
        });
    }
    books.truncate(count);
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANNED: &str = r#"{"books":[{"available":true,"image":"a.jpg","name":"Book A","price":9.99,"rating":4,"url":"http://x/a","urls":["a1.jpg"]},{"available":false,"image":"b.jpg","name":"Book B","price":15.5,"rating":2,"url":"http://x/b","urls":[]}]}"#;

    #[test]
    fn decodes_canned_page() {
        let page = decode_page(CANNED.as_bytes()).unwrap();
        assert_eq!(page.books.len(), 2);

        let a = &page.books[0];
        assert!(a.available);
        assert_eq!(a.image, "a.jpg");
        assert_eq!(a.name, "Book A");
        assert_eq!(a.price, 9.99);
        assert_eq!(a.rating, 4);
        assert_eq!(a.url, "http://x/a");
        assert_eq!(a.urls, vec!["a1.jpg".to_string()]);

        let b = &page.books[1];
        assert!(!b.available);
        assert_eq!(b.name, "Book B");
        assert_eq!(b.price, 15.5);
        assert!(b.urls.is_empty());
    }

    #[test]
    fn missing_and_null_keys_take_zero_values() {
        let raw = br#"{"books":[{"name":"Only a name","price":null,"urls":null}]}"#;
        let page = decode_page(raw).unwrap();
        let book = &page.books[0];
        assert_eq!(book.name, "Only a name");
        assert!(!book.available);
        assert_eq!(book.image, "");
        assert_eq!(book.price, 0.0);
        assert_eq!(book.rating, 0);
        assert!(book.urls.is_empty());
    }

    #[test]
    fn missing_books_key_is_an_empty_page() {
        let page = decode_page(b"{}").unwrap();
        assert!(page.books.is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw = br#"{"next":"page-4.html","books":[{"name":"X","isbn":"123","rating":5}]}"#;
        let page = decode_page(raw).unwrap();
        assert_eq!(page.books[0].rating, 5);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let raw = br#"{"books":[{"Name":"Upper","name":"lower"}]}"#;
        let page = decode_page(raw).unwrap();
        assert_eq!(page.books[0].name, "lower");
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_page(b"<html>not json</html>").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let err = decode_page(br#"{"books":[{"price":"cheap"}]}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));

        let err = decode_page(br#"{"books":[{"rating":300}]}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn select_leading_keeps_order() {
        let page = decode_page(CANNED.as_bytes()).unwrap();
        let selected = select_leading(page.books, 2).unwrap();
        assert_eq!(selected[0].name, "Book A");
        assert_eq!(selected[1].name, "Book B");
    }

    #[test]
    fn select_leading_truncates_longer_pages() {
        let books = vec![Book::default(), Book::default(), Book::default()];
        assert_eq!(select_leading(books, 2).unwrap().len(), 2);
    }

    #[test]
    fn select_leading_rejects_short_pages() {
        let err = select_leading(vec![Book::default()], 2).unwrap_err();
        match err {
            PipelineError::NotEnoughBooks { needed, found } => {
                assert_eq!(needed, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected NotEnoughBooks, got {other:?}"),
        }
    }
}
