use serde::{Deserialize, Serialize};

/// Label names starting with this prefix carry a recurrence tag.
pub const RECUR_PREFIX: &str = "rr";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    /// Only populated by an eager fetch.
    #[serde(default, skip_serializing)]
    pub lists: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct List {
    pub id: String,
    pub name: String,
    /// Only populated by an eager fetch.
    #[serde(default, skip_serializing)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Label {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Recurrence tag derived from `labels`, never sent to Trello.
    #[serde(skip)]
    pub recurs: Option<String>,
}

impl Card {
    /// Recompute `recurs` from the current labels.
    pub fn with_derived_recurs(mut self) -> Self {
        self.recurs = derive_recurs(&self.labels);
        self
    }

    /// True when the card carries a usable recurrence tag.
    pub fn is_recurring(&self) -> bool {
        self.recurs.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Suffix of the first label named `rr...`, e.g. `rrm3` gives `m3`.
pub fn derive_recurs(labels: &[Label]) -> Option<String> {
    labels
        .iter()
        .find_map(|l| l.name.strip_prefix(RECUR_PREFIX))
        .map(str::to_string)
}

/// Payload for creating a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_list: Option<String>,
}

impl NewCard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Form fields as sent in the POST body.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("name".to_string(), self.name.clone())];
        if let Some(desc) = &self.desc {
            form.push(("desc".into(), desc.clone()));
        }
        if let Some(due) = &self.due {
            form.push(("due".into(), due.clone()));
        }
        if let Some(id_list) = &self.id_list {
            form.push(("idList".into(), id_list.clone()));
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Label> {
        names
            .iter()
            .map(|n| Label {
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn no_prefixed_label_means_no_recurrence() {
        assert_eq!(derive_recurs(&labels(&[])), None);
        assert_eq!(derive_recurs(&labels(&["urgent", "home", "r-d7", "Rrd7"])), None);
    }

    #[test]
    fn first_prefixed_label_wins() {
        assert_eq!(
            derive_recurs(&labels(&["chores", "rrm3", "rrd7"])),
            Some("m3".to_string())
        );
        assert_eq!(
            derive_recurs(&labels(&["rrd7", "rrm3"])),
            Some("d7".to_string())
        );
    }

    #[test]
    fn bare_prefix_gives_empty_tag() {
        let card = Card {
            id: "c1".into(),
            name: "Water plants".into(),
            due: None,
            labels: labels(&["rr"]),
            recurs: None,
        }
        .with_derived_recurs();
        assert_eq!(card.recurs.as_deref(), Some(""));
        assert!(!card.is_recurring());
    }

    #[test]
    fn card_deserializes_from_trello_shape() {
        let json = r#"{
            "id": "5f1",
            "name": "Pay rent",
            "due": "2024-01-31T00:00:00.000Z",
            "idList": "l1",
            "labels": [{"id": "x", "name": "rrm1", "color": "green"}]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.due.as_deref(), Some("2024-01-31T00:00:00.000Z"));
        assert_eq!(card.recurs, None);
        assert_eq!(card.with_derived_recurs().recurs.as_deref(), Some("m1"));
    }

    #[test]
    fn null_due_is_none() {
        let card: Card =
            serde_json::from_str(r#"{"id":"a","name":"b","due":null,"labels":[]}"#).unwrap();
        assert_eq!(card.due, None);
    }

    #[test]
    fn recurs_is_never_serialized() {
        let card = Card {
            id: "a".into(),
            name: "b".into(),
            due: None,
            labels: labels(&["rrd1"]),
            recurs: Some("d1".into()),
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("recurs"));
    }

    #[test]
    fn new_card_form_skips_missing_fields() {
        let mut card = NewCard::new("Take out bins");
        card.id_list = Some("l9".into());
        assert_eq!(
            card.to_form(),
            vec![
                ("name".to_string(), "Take out bins".to_string()),
                ("idList".to_string(), "l9".to_string()),
            ]
        );
    }
}
