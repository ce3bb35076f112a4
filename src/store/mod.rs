// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod expenses;
pub mod installments;
pub mod savings;
pub mod subscriptions;
pub mod users;

use rust_decimal::Decimal;

/// Amounts are stored as TEXT; convert inside row mappers so a corrupt cell
/// surfaces as a column conversion failure rather than a panic.
pub(crate) fn decimal_column(idx: usize, raw: String) -> rusqlite::Result<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
