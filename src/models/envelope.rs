//! Response envelopes used by the finance backend.

use serde::Deserialize;

/// Body that is either wrapped as `{ "data": T }` or returned bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// Collection body in any of the shapes the backend uses for lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items { items: Vec<T> },
    Templates { templates: Vec<T> },
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Items { items } => items,
            Listing::Templates { templates } => templates,
            Listing::Plain(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i32,
    }

    fn decode(body: &str) -> Vec<Row> {
        serde_json::from_str::<Envelope<Listing<Row>>>(body)
            .unwrap()
            .into_inner()
            .into_vec()
    }

    #[test]
    fn unwraps_every_list_shape() {
        let expected = vec![Row { id: 1 }, Row { id: 2 }];

        assert_eq!(decode(r#"[{"id":1},{"id":2}]"#), expected);
        assert_eq!(decode(r#"{"data":[{"id":1},{"id":2}]}"#), expected);
        assert_eq!(decode(r#"{"items":[{"id":1},{"id":2}]}"#), expected);
        assert_eq!(decode(r#"{"templates":[{"id":1},{"id":2}]}"#), expected);
        assert_eq!(decode(r#"{"data":{"templates":[{"id":1},{"id":2}]}}"#), expected);
    }

    #[test]
    fn bare_object_is_accepted() {
        let row = serde_json::from_str::<Envelope<Row>>(r#"{"id":5}"#)
            .unwrap()
            .into_inner();
        assert_eq!(row, Row { id: 5 });
    }
}
