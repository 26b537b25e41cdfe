use crate::balance::{Balances, PersonalBalance};
use crate::schemas::{Money, Participant, ParticipantId};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Balances within this distance of zero are considered settled, and no
/// transfer smaller than it is emitted.
pub const SETTLEMENT_TOLERANCE: Money = dec!(0.01);

const UNKNOWN_PARTICIPANT: &str = "Unknown";

/// Resolves participant ids to display names.
pub trait ParticipantNames {
    fn participant_name(&self, id: ParticipantId) -> Option<&str>;
}

impl ParticipantNames for [Participant] {
    fn participant_name(&self, id: ParticipantId) -> Option<&str> {
        self.iter()
            .find(|participant| participant.id == id)
            .map(|participant| participant.name.as_str())
    }
}

impl ParticipantNames for Vec<Participant> {
    fn participant_name(&self, id: ParticipantId) -> Option<&str> {
        self.as_slice().participant_name(id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettlementParty {
    pub id: ParticipantId,
    pub name: String,
}

impl SettlementParty {
    fn resolve(id: ParticipantId, names: &(impl ParticipantNames + ?Sized)) -> Self {
        Self {
            id,
            name: names
                .participant_name(id)
                .unwrap_or(UNKNOWN_PARTICIPANT)
                .to_string(),
        }
    }
}

/// `from` pays `amount` to `to`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settlement {
    pub from: SettlementParty,
    pub to: SettlementParty,
    pub amount: Money,
}

/// Greedily matches the largest creditor with the largest debtor until one
/// side runs out.
///
/// Participants within [`SETTLEMENT_TOLERANCE`] of zero take no part. Both
/// sides are sorted by amount, largest first; the sort is stable so equal
/// amounts keep the order of `balances`. Emits at most
/// `creditors + debtors - 1` transfers.
pub fn compute_settlements(
    balances: &Balances,
    names: &(impl ParticipantNames + ?Sized),
) -> Vec<Settlement> {
    let mut receivers = Vec::new();
    let mut payers = Vec::new();

    for entry in balances {
        if entry.balance > SETTLEMENT_TOLERANCE {
            receivers.push(*entry);
        } else if entry.balance < -SETTLEMENT_TOLERANCE {
            payers.push(PersonalBalance {
                id: entry.id,
                balance: entry.balance.abs(),
            });
        }
    }

    receivers.sort_by(|a, b| b.balance.cmp(&a.balance));
    payers.sort_by(|a, b| b.balance.cmp(&a.balance));

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < receivers.len() && j < payers.len() {
        let receiver = &mut receivers[i];
        let payer = &mut payers[j];
        let amount = receiver.balance.min(payer.balance);

        if amount > SETTLEMENT_TOLERANCE {
            settlements.push(Settlement {
                from: SettlementParty::resolve(payer.id, names),
                to: SettlementParty::resolve(receiver.id, names),
                amount,
            });
        }

        receiver.balance -= amount;
        payer.balance -= amount;

        if receiver.balance < SETTLEMENT_TOLERANCE {
            i += 1;
        }
        if payer.balance < SETTLEMENT_TOLERANCE {
            j += 1;
        }
    }
    settlements
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|name| Participant {
                id: ParticipantId::new(),
                name: name.to_string(),
            })
            .collect()
    }

    fn balances(people: &[Participant], amounts: &[Money]) -> Balances {
        people
            .iter()
            .zip(amounts)
            .map(|(person, amount)| (person.id, *amount))
            .collect()
    }

    fn summary(settlements: &[Settlement]) -> Vec<(&str, &str, Money)> {
        settlements
            .iter()
            .map(|s| (s.from.name.as_str(), s.to.name.as_str(), s.amount))
            .collect()
    }

    #[rstest]
    #[case::one_creditor(
        &[dec!(200), dec!(-100), dec!(-100)],
        vec![("B", "A", dec!(100)), ("C", "A", dec!(100))]
    )]
    #[case::pair(&[dec!(45), dec!(-45), dec!(0)], vec![("B", "A", dec!(45))])]
    #[case::largest_first(
        &[dec!(-10), dec!(-60), dec!(70)],
        vec![("B", "C", dec!(60)), ("A", "C", dec!(10))]
    )]
    #[case::split_creditors(
        &[dec!(30), dec!(50), dec!(-80)],
        vec![("C", "B", dec!(50)), ("C", "A", dec!(30))]
    )]
    #[case::chain(
        &[dec!(40), dec!(-25), dec!(-25), dec!(10)],
        vec![("B", "A", dec!(25)), ("C", "A", dec!(15)), ("C", "D", dec!(10))]
    )]
    #[case::dust_ignored(&[dec!(0.005), dec!(-0.005), dec!(0)], vec![])]
    #[case::exactly_at_tolerance(&[dec!(0.01), dec!(-0.01), dec!(0)], vec![])]
    #[case::residue_lands_on_tolerance(
        &[dec!(10.02), dec!(-10.01), dec!(-0.01)],
        vec![("B", "A", dec!(10.01))]
    )]
    #[case::transfer_at_tolerance_dropped(
        &[dec!(10.01), dec!(-10), dec!(-0.02)],
        vec![("B", "A", dec!(10))]
    )]
    #[case::residue_just_above_tolerance(
        &[dec!(10.03), dec!(-10), dec!(-0.03)],
        vec![("B", "A", dec!(10)), ("C", "A", dec!(0.03))]
    )]
    #[case::thirds(
        &[
            dec!(66.666666666666666666666666667),
            dec!(-33.333333333333333333333333333),
            dec!(-33.333333333333333333333333333),
        ],
        vec![
            ("B", "A", dec!(33.333333333333333333333333333)),
            ("C", "A", dec!(33.333333333333333333333333333)),
        ]
    )]
    fn resolves(#[case] amounts: &[Money], #[case] expected: Vec<(&str, &str, Money)>) {
        let people = people(&["A", "B", "C", "D"]);
        let settlements = compute_settlements(&balances(&people, amounts), &people);

        assert_eq!(summary(&settlements), expected);
    }

    #[test]
    fn equal_amounts_keep_insertion_order() {
        let people = people(&["A", "B", "C", "D"]);
        let amounts = [dec!(-20), dec!(20), dec!(-20), dec!(20)];

        let settlements = compute_settlements(&balances(&people, &amounts), &people);

        assert_eq!(
            summary(&settlements),
            vec![("A", "B", dec!(20)), ("C", "D", dec!(20))]
        );
    }

    #[test]
    fn unknown_names_fall_back() {
        let people = people(&["A"]);
        let stranger = ParticipantId::new();
        let balances: Balances = [(people[0].id, dec!(5)), (stranger, dec!(-5))]
            .into_iter()
            .collect();

        let settlements = compute_settlements(&balances, &people);

        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].from.id, stranger);
        assert_eq!(settlements[0].from.name, "Unknown");
        assert_eq!(settlements[0].to.name, "A");
    }

    #[test]
    fn empty_balances_need_no_transfers() {
        let people: Vec<Participant> = Vec::new();
        assert!(compute_settlements(&Balances::default(), &people).is_empty());
    }
}
