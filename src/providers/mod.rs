pub mod dry_run;
pub mod trello;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::TrelloError;
use crate::model::board::{Board, Card, List, NewCard};

/// Status and body of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Form fields for a POST or PUT body.
pub type Form = Vec<(String, String)>;

/// Read, create and update against Trello resource paths such as
/// `boards/{id}/lists`. Retrieval and mutation helpers are built on top.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, TrelloError>;
    async fn create(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError>;
    async fn update(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError>;

    /// Fetch the board; with `eager`, also its lists and their cards.
    async fn get_board(&self, board_id: &str, eager: bool) -> Result<Board, TrelloError> {
        let resource = format!("boards/{board_id}");
        let mut board: Board = decode(&resource, self.fetch(&resource).await?)?;
        if eager {
            board.lists = self.get_lists(board_id, true).await?;
        }
        Ok(board)
    }

    /// Fetch the lists of a board. With `eager` this costs one extra call per list.
    async fn get_lists(&self, board_id: &str, eager: bool) -> Result<Vec<List>, TrelloError> {
        let resource = format!("boards/{board_id}/lists");
        let mut lists: Vec<List> = decode(&resource, self.fetch(&resource).await?)?;
        if eager {
            for list in &mut lists {
                list.cards = self.get_cards(&list.id).await?;
            }
        }
        Ok(lists)
    }

    async fn get_cards(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
        let resource = format!("lists/{list_id}/cards");
        let cards: Vec<Card> = decode(&resource, self.fetch(&resource).await?)?;
        Ok(cards.into_iter().map(Card::with_derived_recurs).collect())
    }

    /// Set a single card attribute, e.g. `due` or `idList`.
    async fn update_card_attribute(
        &self,
        card: &Card,
        attribute: &str,
        value: &str,
    ) -> Result<RawResponse, TrelloError> {
        let resource = format!("cards/{}/{attribute}", card.id);
        let form = vec![("value".to_string(), value.to_string())];
        self.update(&resource, &form).await
    }

    async fn create_card_on_list(
        &self,
        list_id: &str,
        mut card: NewCard,
    ) -> Result<RawResponse, TrelloError> {
        card.id_list = Some(list_id.to_string());
        self.create("cards", &card.to_form()).await
    }
}

fn decode<T: DeserializeOwned>(resource: &str, value: serde_json::Value) -> Result<T, TrelloError> {
    serde_json::from_value(value).map_err(|source| TrelloError::Decode {
        resource: resource.to_string(),
        source,
    })
}
