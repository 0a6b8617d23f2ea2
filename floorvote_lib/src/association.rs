//! Decides which bill a debate, or each turn of a debate, is about.

use std::collections::HashMap;

use floorvote_records::types::BillId;
use floorvote_records::RecordStore;
use serde::Serialize;

/// Most frequently mentioned bill. Ties go to the bill mentioned first.
pub fn most_mentioned(mentions: &[BillId]) -> Option<&BillId> {
    let mut counts: HashMap<&BillId, (usize, usize)> = HashMap::new();
    for (pos, bill_id) in mentions.iter().enumerate() {
        counts.entry(bill_id).or_insert((0, pos)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(bill_id, _)| bill_id)
}

/// Carries bill decisions forward across turns.
///
/// Turns before (and at) the first direct association take that bill.
/// After it, each turn takes its own direct association when it has one,
/// otherwise the last bill seen. With no direct association at all every
/// turn stays unassigned.
pub fn forward_fill(direct: &[Option<BillId>]) -> Vec<Option<BillId>> {
    let Some(first) = direct.iter().flatten().next() else {
        return vec![None; direct.len()];
    };
    let mut current = first.clone();
    direct
        .iter()
        .map(|assoc| {
            if let Some(bill_id) = assoc {
                current = bill_id.clone();
            }
            Some(current.clone())
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssociationReport {
    pub debates_with_bill: usize,
    pub debates_with_roll: usize,
    pub turns_with_bill: usize,
}

/// Sets `Debate::bill`, every `Turn::main_bill`, and `Debate::roll` from
/// the associated bill's canonical roll.
pub fn associate_bills(store: &mut RecordStore) -> AssociationReport {
    let mut report = AssociationReport::default();
    let canonical_rolls: HashMap<BillId, String> = store
        .bills()
        .iter()
        .filter_map(|bill| bill.canonical_roll.clone().map(|roll| (bill.id.clone(), roll)))
        .collect();

    for debate in store.debates_mut().iter_mut() {
        debate.bill = most_mentioned(&debate.bills_mentioned).cloned();
        debate.roll = debate
            .bill
            .as_ref()
            .and_then(|bill_id| canonical_rolls.get(bill_id).cloned());

        let direct: Vec<Option<BillId>> = debate
            .turns()
            .iter()
            .map(|turn| most_mentioned(&turn.bills_mentioned).cloned())
            .collect();
        for (turn, main_bill) in debate.turns_mut().iter_mut().zip(forward_fill(&direct)) {
            if main_bill.is_some() {
                report.turns_with_bill += 1;
            }
            turn.main_bill = main_bill;
        }

        if debate.bill.is_some() {
            report.debates_with_bill += 1;
        }
        if debate.roll.is_some() {
            report.debates_with_roll += 1;
        }
    }

    tracing::info!(
        debates_with_bill = report.debates_with_bill,
        debates_with_roll = report.debates_with_roll,
        turns_with_bill = report.turns_with_bill,
        "associated debates with bills"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorvote_records::types::{Bill, Debate};

    fn bill(s: &str) -> BillId {
        s.parse().unwrap()
    }

    fn bills(ids: &[&str]) -> Vec<BillId> {
        ids.iter().map(|s| bill(s)).collect()
    }

    #[test]
    fn test_most_mentioned() {
        assert_eq!(most_mentioned(&bills(&["h-1", "h-2", "h-1"])), Some(&bill("h-1")));
        assert_eq!(most_mentioned(&bills(&["h-2", "h-1", "h-1"])), Some(&bill("h-1")));
        assert_eq!(most_mentioned(&[]), None);
    }

    #[test]
    fn test_most_mentioned_tie_goes_to_first() {
        assert_eq!(most_mentioned(&bills(&["h-1", "h-2"])), Some(&bill("h-1")));
        assert_eq!(most_mentioned(&bills(&["s-9", "h-2", "h-2", "s-9"])), Some(&bill("s-9")));
    }

    #[test]
    fn test_forward_fill() {
        let direct = vec![None, Some(bill("h-5")), None, Some(bill("h-9")), None];
        assert_eq!(
            forward_fill(&direct),
            vec![
                Some(bill("h-5")),
                Some(bill("h-5")),
                Some(bill("h-5")),
                Some(bill("h-9")),
                Some(bill("h-9")),
            ]
        );
    }

    #[test]
    fn test_forward_fill_without_associations() {
        assert_eq!(forward_fill(&[None, None]), vec![None, None]);
        assert!(forward_fill(&[]).is_empty());
    }

    #[test]
    fn test_associate_bills() {
        let mut store = RecordStore::new();
        let mut passed = Bill::new(bill("h-42"));
        passed.canonical_roll = Some("h2011-12".to_string());
        store.insert_bill(passed);

        let mut debate = Debate::new("h2011-03-01-1", "");
        debate.push_speaking("a", "opening", vec![], None);
        debate.push_speaking("b", "on h-42", vec![bill("h-42"), bill("h-42")], None);
        debate.push_speaking("c", "on s-3", vec![bill("s-3")], None);
        debate.push_speaking("d", "reply", vec![], None);
        store.insert_debate(debate);
        store.insert_debate(Debate::new("h2011-03-02-1", ""));

        let report = associate_bills(&mut store);
        assert_eq!(report.debates_with_bill, 1);
        assert_eq!(report.debates_with_roll, 1);
        assert_eq!(report.turns_with_bill, 4);

        let debate = store.debates().get("h2011-03-01-1").unwrap();
        assert_eq!(debate.bill, Some(bill("h-42")));
        assert_eq!(debate.roll.as_deref(), Some("h2011-12"));
        let main: Vec<Option<BillId>> = debate.turns().iter().map(|t| t.main_bill.clone()).collect();
        assert_eq!(
            main,
            vec![Some(bill("h-42")), Some(bill("h-42")), Some(bill("s-3")), Some(bill("s-3"))]
        );

        let empty = store.debates().get("h2011-03-02-1").unwrap();
        assert_eq!(empty.bill, None);
        assert_eq!(empty.roll, None);
    }
}
