use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One catalogue entry as emitted by the scraping collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(deserialize_with = "null_as_default")]
    pub available: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    /// Star rating, 0 when the collaborator could not recognise it.
    #[serde(deserialize_with = "null_as_default")]
    pub rating: u8,
    /// Canonical product link.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub urls: Vec<String>,
}

/// The top-level document: books in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(deserialize_with = "null_as_default")]
    pub books: Vec<Book>,
}

// A `null` leaves the field at its zero value, same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Book {
    /// `{available image name price rating url [urls...]}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} {} {} {} {} {} [{}]}}",
            self.available,
            self.image,
            self.name,
            self.price,
            self.rating,
            self.url,
            self.urls.join(" ")
        )
    }
}
