use crate::config::Settings;
use crate::error::{ListRole, TrelloError};
use crate::model::board::List;
use crate::providers::{BoardApi, RawResponse};
use crate::recur::{tick_recurring_card, TickOutcome};

/// A done card that was sent back to the recurring list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedCard {
    pub id: String,
    pub name: String,
    pub outcome: TickOutcome,
    pub moved: RawResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub board: String,
    pub processed: Vec<ProcessedCard>,
    /// Done cards without a recurrence tag.
    pub untouched: usize,
}

/// First list in board order named `name`.
pub fn find_list<'a>(lists: &'a [List], name: &str, role: ListRole) -> Result<&'a List, TrelloError> {
    lists
        .iter()
        .find(|l| l.name == name)
        .ok_or_else(|| TrelloError::ListNotFound {
            role,
            name: name.to_string(),
        })
}

/// Tick every recurring card in the done list and move it back to the
/// recurring list. Cards whose tick is skipped are still moved.
pub async fn run<A: BoardApi + ?Sized>(
    api: &A,
    settings: &Settings,
) -> Result<RunSummary, TrelloError> {
    if settings.recurring_list_name == settings.done_list_name {
        return Err(TrelloError::SameListName {
            name: settings.done_list_name.clone(),
        });
    }
    let board = api.get_board(&settings.relevant_board_id, true).await?;
    let recurring = find_list(&board.lists, &settings.recurring_list_name, ListRole::Recurring)?;
    let done = find_list(&board.lists, &settings.done_list_name, ListRole::Done)?;
    tracing::info!(
        board = %board.name,
        done_cards = done.cards.len(),
        "checking done list for recurring cards"
    );

    let mut summary = RunSummary {
        board: board.name.clone(),
        processed: Vec::new(),
        untouched: 0,
    };
    for card in &done.cards {
        if !card.is_recurring() {
            summary.untouched += 1;
            continue;
        }
        let outcome = tick_recurring_card(api, card).await?;
        let moved = api.update_card_attribute(card, "idList", &recurring.id).await?;
        tracing::info!(card = %card.name, list = %recurring.name, "moved card");
        summary.processed.push(ProcessedCard {
            id: card.id.clone(),
            name: card.name.clone(),
            outcome,
            moved,
        });
    }
    Ok(summary)
}
