// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defines a closed set of TEXT-encoded values: Display/FromStr plus the
/// rusqlite conversions so the variants can be bound and read directly.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    )),
                }
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value.as_str()?.parse().map_err(|e: String| {
                    rusqlite::types::FromSqlError::Other(e.into())
                })
            }
        }
    };
}

text_enum!(CategoryFamily {
    Expense => "expense",
    Subscription => "subscription",
    Installment => "installment",
});

text_enum!(Periodicity {
    Monthly => "monthly",
    Annual => "annual",
});

text_enum!(InstallmentPeriodicity {
    Monthly => "monthly",
    Biweekly => "biweekly",
});

text_enum!(SavingKind {
    Cash => "cash",
    Bank => "bank",
    Investment => "investment",
    Other => "other",
});

text_enum!(MovementKind {
    Deposit => "deposit",
    Withdrawal => "withdrawal",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub description: String,
    pub category_id: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Fields an update may change; everything else on Expense is fixed.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ExpensePatch {
    pub fn apply_to(&self, e: &mut Expense) {
        if let Some(amount) = self.amount {
            e.amount = amount;
        }
        if let Some(ref description) = self.description {
            e.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            e.category_id = Some(category_id);
        }
        if let Some(date) = self.date {
            e.date = date;
        }
        if let Some(ref notes) = self.notes {
            e.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub active: bool,
    pub family: CategoryFamily,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub family: CategoryFamily,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub active: Option<bool>,
}

impl CategoryPatch {
    pub fn apply_to(&self, c: &mut Category) {
        if let Some(ref name) = self.name {
            c.name = name.clone();
        }
        if let Some(ref icon) = self.icon {
            c.icon = icon.clone();
        }
        if let Some(ref color) = self.color {
            c.color = color.clone();
        }
        if let Some(active) = self.active {
            c.active = active;
        }
    }
}

/// `amount` is always the current price; past prices live in the
/// subscription's price history ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub periodicity: Periodicity,
    pub start_date: Option<NaiveDate>,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub amount: Decimal,
    pub category_id: i64,
    pub periodicity: Periodicity,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// `start_date` and `notes` are doubly optional: the outer level is "change
/// it or not", the inner level is the new value, so `Some(None)` clears the
/// field. Clearing the start date returns the item to always-active.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub periodicity: Option<Periodicity>,
    pub start_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl SubscriptionPatch {
    pub fn apply_to(&self, s: &mut Subscription) {
        if let Some(ref name) = self.name {
            s.name = name.clone();
        }
        if let Some(amount) = self.amount {
            s.amount = amount;
        }
        if let Some(category_id) = self.category_id {
            s.category_id = Some(category_id);
        }
        if let Some(periodicity) = self.periodicity {
            s.periodicity = periodicity;
        }
        if let Some(start_date) = self.start_date {
            s.start_date = start_date;
        }
        if let Some(active) = self.active {
            s.active = active;
        }
        if let Some(ref notes) = self.notes {
            s.notes = notes.clone();
        }
    }
}

/// One slice of a subscription's price timeline. `valid_until` is None for
/// the price currently in effect; ranges never overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub subscription_id: i64,
    pub amount: Decimal,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPurchase {
    pub id: i64,
    pub name: String,
    pub total_amount: Decimal,
    pub total_installments: u32,
    pub installment_amount: Decimal,
    pub category_id: Option<i64>,
    pub periodicity: InstallmentPeriodicity,
    pub start_date: NaiveDate,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewInstallment {
    pub name: String,
    pub total_amount: Decimal,
    pub total_installments: u32,
    pub installment_amount: Decimal,
    pub category_id: i64,
    pub periodicity: InstallmentPeriodicity,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InstallmentPatch {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

impl InstallmentPatch {
    pub fn apply_to(&self, i: &mut InstallmentPurchase) {
        if let Some(ref name) = self.name {
            i.name = name.clone();
        }
        if let Some(category_id) = self.category_id {
            i.category_id = Some(category_id);
        }
        if let Some(active) = self.active {
            i.active = active;
        }
        if let Some(ref notes) = self.notes {
            i.notes = Some(notes.clone());
        }
    }
}

/// One row of an installment purchase's generated payment schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub installment_id: i64,
    pub seq: u32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
}

/// A savings pot. Its balance is never stored: it is derived from the
/// movement ledger on read, so the two cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saving {
    pub id: i64,
    pub name: String,
    pub kind: SavingKind,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSaving {
    pub name: String,
    pub kind: SavingKind,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SavingPatch {
    pub name: Option<String>,
    pub kind: Option<SavingKind>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

impl SavingPatch {
    pub fn apply_to(&self, s: &mut Saving) {
        if let Some(ref name) = self.name {
            s.name = name.clone();
        }
        if let Some(kind) = self.kind {
            s.kind = kind;
        }
        if let Some(active) = self.active {
            s.active = active;
        }
        if let Some(ref notes) = self.notes {
            s.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub saving_id: i64,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Single local profile; only consumed by the backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub pin: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
