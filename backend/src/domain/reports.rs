//! Admin report value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Money, ProfileId};

/// Inclusive time window over job payment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportWindowError {
    #[error("start ({start}) must not be after end ({end})")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ReportWindowError> {
        if start > end {
            return Err(ReportWindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Total earned by one contractor profession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub earned: Money,
}

/// Total paid by one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSpend {
    pub id: ProfileId,
    pub full_name: String,
    pub paid: Money,
}

/// How many clients the best-clients report returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestClientsLimit(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be between {min} and {max}, got {value}", min = BestClientsLimit::MIN, max = BestClientsLimit::MAX)]
pub struct BestClientsLimitError {
    pub value: i64,
}

impl BestClientsLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;
    pub const DEFAULT: Self = Self(2);

    pub fn new(value: i64) -> Result<Self, BestClientsLimitError> {
        u32::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(BestClientsLimitError { value })
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BestClientsLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rank clients by amount paid, highest first, ties broken by id.
pub fn rank_clients(mut spends: Vec<ClientSpend>, limit: BestClientsLimit) -> Vec<ClientSpend> {
    spends.sort_by(|a, b| b.paid.cmp(&a.paid).then(a.id.cmp(&b.id)));
    spends.truncate(limit.get() as usize);
    spends
}

/// Pick the highest earning profession, ties broken alphabetically.
pub fn top_profession(earnings: Vec<ProfessionEarnings>) -> Option<ProfessionEarnings> {
    earnings
        .into_iter()
        .min_by(|a, b| b.earned.cmp(&a.earned).then_with(|| a.profession.cmp(&b.profession)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 8, day, 0, 0, 0).single().expect("valid date")
    }

    fn money(cents: i64) -> Money {
        Money::from_minor_units(cents).expect("valid cents")
    }

    #[rstest]
    fn window_is_inclusive() {
        let window = ReportWindow::new(at(10), at(15)).expect("valid window");
        assert!(window.contains(at(10)));
        assert!(window.contains(at(15)));
        assert!(!window.contains(at(16)));
    }

    #[rstest]
    fn window_rejects_inverted_bounds() {
        assert!(ReportWindow::new(at(15), at(10)).is_err());
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(100, true)]
    #[case(101, false)]
    #[case(-3, false)]
    fn limit_bounds(#[case] value: i64, #[case] valid: bool) {
        assert_eq!(BestClientsLimit::new(value).is_ok(), valid);
    }

    #[rstest]
    fn ranks_clients_by_amount_paid() {
        let spend = |id: i64, cents: i64| ClientSpend {
            id: ProfileId::new(id),
            full_name: format!("Client {id}"),
            paid: money(cents),
        };
        let ranked = rank_clients(
            vec![spend(1, 44_200), spend(4, 2_020), spend(2, 44_200), spend(3, 30_000)],
            BestClientsLimit::default(),
        );
        let ids: Vec<i64> = ranked.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    fn top_profession_prefers_highest_earnings() {
        let earned = |profession: &str, cents: i64| ProfessionEarnings {
            profession: profession.to_owned(),
            earned: money(cents),
        };
        let best = top_profession(vec![
            earned("Musician", 2_000),
            earned("Programmer", 260_200),
            earned("Fighter", 20_000),
        ]);
        assert_eq!(best.map(|b| b.profession), Some("Programmer".to_owned()));
        assert_eq!(top_profession(Vec::new()), None);
    }
}
