use super::TagId;

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Display color as sent by the backend, e.g. `#3b82f6`
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_list() {
        let sample = r##"[{"id": 1, "name": "entrance", "color": "#ff0000"}, {"id": 2, "name": "lobby", "color": "#00ff00", "created_at": "2025-01-01T00:00:00Z"}]"##;
        let tags = serde_json::from_str::<Vec<Tag>>(sample).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "entrance");
        assert_eq!(tags[1].color, "#00ff00");
    }
}
