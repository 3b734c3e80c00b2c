//! Cross-region size conversion by exact foot length

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::store::Store;
use crate::entities::size_chart::{ChartKey, Gender, Region, SizeEntry};

/// Read access to size charts, as needed by the resolver
pub trait SizeCatalog {
    /// All entries of the chart for `key`; `NotFound` if there is no such chart
    fn chart_entries(&self, key: ChartKey) -> Result<Vec<SizeEntry>>;
}

impl SizeCatalog for Store {
    fn chart_entries(&self, key: ChartKey) -> Result<Vec<SizeEntry>> {
        let chart = self.chart(key)?;
        self.size_entries(&chart.id)
    }
}

/// A conversion query: size `size` in `from` to the `to` region
#[derive(Debug, Clone)]
pub struct SizeConversionRequest {
    pub size: String,
    pub from: Region,
    pub to: Region,
    pub gender: Gender,
}

/// Successful conversion result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeConversion {
    pub success: bool,
    pub from_size: String,
    pub from_region: Region,
    pub to_region: Region,
    pub converted_size: String,
    pub length_mm: Decimal,
}

/// Payload reported when no conversion exists
#[derive(Debug, Clone, Serialize)]
pub struct ConversionFailure {
    pub success: bool,
    pub error: String,
}

impl ConversionFailure {
    pub fn not_found() -> Self {
        Self {
            success: false,
            error: "Size conversion not found".to_string(),
        }
    }
}

/// Convert a size label between regions
///
/// The target size must have exactly the same foot length as the source;
/// there is no nearest-size fallback. A target chart with several sizes at
/// that length is a `Validation` error. The reported length is the target
/// entry's.
pub fn convert<C: SizeCatalog + ?Sized>(
    catalog: &C,
    request: &SizeConversionRequest,
) -> Result<SizeConversion> {
    let from_key = ChartKey::new(request.from, request.gender);
    let to_key = ChartKey::new(request.to, request.gender);

    let source = catalog
        .chart_entries(from_key)?
        .into_iter()
        .find(|e| e.label == request.size)
        .ok_or_else(|| {
            tracing::debug!(chart = %from_key, size = %request.size, "source size missing");
            Error::not_found("size", format!("{} {}", from_key, request.size))
        })?;

    let mut matches = catalog
        .chart_entries(to_key)?
        .into_iter()
        .filter(|e| e.length_mm == source.length_mm);
    let target = matches.next().ok_or_else(|| {
        tracing::debug!(chart = %to_key, length_mm = %source.length_mm, "no size with matching length");
        Error::not_found(
            "size conversion",
            format!("{} {} -> {}", from_key, request.size, to_key),
        )
    })?;
    if let Some(other) = matches.next() {
        return Err(Error::validation(format!(
            "size chart {} lists more than one size at {} mm ({}, {})",
            to_key, source.length_mm, target.label, other.label
        )));
    }

    Ok(SizeConversion {
        success: true,
        from_size: source.label,
        from_region: request.from,
        to_region: request.to,
        converted_size: target.label,
        length_mm: target.length_mm,
    })
}
