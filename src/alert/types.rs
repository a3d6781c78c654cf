//! Alert payload

use crate::market::AssetSnapshot;
use crate::momentum::{EmaSlope, EmaStats};
use crate::signal::MomentumCondition;
use crate::volume::VolumeStats;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A confirmed volume spike with its momentum reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub asset: AssetSnapshot,
    pub volume: VolumeStats,
    pub momentum: EmaStats,
    /// EMA length the momentum reading was configured with
    pub ema_periods: usize,
    /// Momentum conditions that were checked and held
    pub conditions: Vec<MomentumCondition>,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Create a new alert
    pub fn new(
        asset: AssetSnapshot,
        volume: VolumeStats,
        momentum: EmaStats,
        ema_periods: usize,
        conditions: Vec<MomentumCondition>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset,
            volume,
            momentum,
            ema_periods,
            conditions,
            timestamp: Utc::now(),
        }
    }

    /// Conditions joined for logging, e.g. "Price > EMA, EMA Rising"
    pub fn conditions_summary(&self) -> String {
        self.conditions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the message body sent to Telegram or the console
    pub fn format_message(&self) -> String {
        let price_vs_ema = if self.momentum.price_above_ema {
            "\u{2705} Above EMA"
        } else {
            "\u{274c} Below EMA"
        };

        let trend = match self.momentum.slope {
            EmaSlope::Rising => "\u{2705} EMA Rising",
            EmaSlope::NotRising => "\u{274c} EMA Flat/Down",
            EmaSlope::Unknown => "\u{2753} EMA Slope Unknown",
        };

        format!(
            "\u{1f6a8} VOLUME SPIKE + MOMENTUM DETECTED\n\
             Token: ${name}\n\
             Volume: ${volume}\n\
             Sigma Dev: {sigma:.2}\n\
             Z-Score: {z:.2}\n\
             Price: ${price:.4}\n\
             {method}-{periods}: ${ema:.4}\n\
             Momentum: {price_vs_ema}\n\
             Trend: {trend}\n\
             Analysis: {vol_periods} vol periods, {price_periods} price periods",
            name = self.asset.name,
            volume = format_thousands(self.asset.volume_24h),
            sigma = self.volume.sigma_deviation,
            z = self.volume.z_score,
            price = self.momentum.current_price,
            method = self.momentum.method,
            periods = self.ema_periods,
            ema = self.momentum.ema_value,
            vol_periods = self.volume.periods_analyzed,
            price_periods = self.momentum.periods_used,
        )
    }
}

/// Whole-dollar amount with comma thousands separators
fn format_thousands(value: Decimal) -> String {
    let rounded = value.round().abs().to_string();
    let digits = rounded.split('.').next().unwrap_or("0");

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value.is_sign_negative() && !value.round().is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
