use crate::schemas::{Expense, Money, Participant, ParticipantId};
use serde::Serialize;

/// Net position of one participant: positive when the others owe them,
/// negative when they owe the others.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PersonalBalance {
    pub id: ParticipantId,
    pub balance: Money,
}

/// Balances in participant insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Balances(Vec<PersonalBalance>);

impl Balances {
    pub fn get(&self, id: ParticipantId) -> Option<Money> {
        self.0
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalBalance> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every balance. Zero up to decimal precision for anything
    /// produced by [`compute_balances`].
    pub fn total(&self) -> Money {
        self.0.iter().map(|entry| entry.balance).sum()
    }

    fn entry(&mut self, id: ParticipantId) -> &mut Money {
        let index = match self.0.iter().position(|entry| entry.id == id) {
            Some(index) => index,
            None => {
                self.0.push(PersonalBalance {
                    id,
                    balance: Money::ZERO,
                });
                self.0.len() - 1
            }
        };
        &mut self.0[index].balance
    }
}

impl FromIterator<(ParticipantId, Money)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Money)>>(iter: T) -> Self {
        let mut balances = Balances::default();
        for (id, amount) in iter {
            *balances.entry(id) += amount;
        }
        balances
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a PersonalBalance;
    type IntoIter = std::slice::Iter<'a, PersonalBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every participant starts at zero. The payer is credited the full amount,
/// then each member of the split is debited `amount / split size`. A payer
/// who is also in the split gets both.
///
/// Amounts must sum within `Money` range; a [`Ledger`](crate::ledger::Ledger)
/// caps its total at [`MAX_LEDGER_TOTAL`](crate::ledger::MAX_LEDGER_TOTAL).
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> Balances {
    let mut balances: Balances = participants
        .iter()
        .map(|participant| (participant.id, Money::ZERO))
        .collect();

    for expense in expenses {
        let Some(share) = expense
            .amount
            .checked_div(Money::from(expense.split_between.len()))
        else {
            continue;
        };
        *balances.entry(expense.paid_by) += expense.amount;
        for receiver in &expense.split_between {
            *balances.entry(*receiver) -= share;
        }
    }
    balances
}
