//! Size chart and size entry persistence

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{conflict_on_unique, decimal_col, id_col, not_found_on_empty, opt_decimal_col, parse_col, Store};
use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::entities::size_chart::{ChartKey, SizeChart, SizeEntry};

const CHART_COLUMNS: &str = "id, name, region, gender, description, created";
const ENTRY_COLUMNS: &str = "id, chart_id, label, length_mm, width_mm";

fn chart_from_row(row: &Row<'_>) -> rusqlite::Result<SizeChart> {
    Ok(SizeChart {
        id: id_col(row, 0)?,
        name: row.get(1)?,
        region: parse_col(row, 2)?,
        gender: parse_col(row, 3)?,
        description: row.get(4)?,
        created: row.get(5)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<SizeEntry> {
    Ok(SizeEntry {
        id: id_col(row, 0)?,
        chart_id: id_col(row, 1)?,
        label: row.get(2)?,
        length_mm: decimal_col(row, 3)?,
        width_mm: opt_decimal_col(row, 4)?,
    })
}

fn insert_entry_row(conn: &Connection, chart: &SizeChart, entry: &SizeEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO size_entries (id, chart_id, label, length_mm, width_mm)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.id.to_string(),
            entry.chart_id.to_string(),
            entry.label,
            entry.length_mm.to_string(),
            entry.width_mm.map(|w| w.to_string()),
        ],
    )
    .map_err(|e| conflict_on_unique(e, "size entry", &format!("{} {}", chart.key(), entry.label)))?;
    tracing::debug!(chart = %chart.key(), label = %entry.label, length_mm = %entry.length_mm, "size entry added");
    Ok(())
}

impl Store {
    /// Insert a size chart; (region, gender) must be unique
    pub fn insert_chart(&self, chart: &SizeChart) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO size_charts (id, name, region, gender, description, created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    chart.id.to_string(),
                    chart.name,
                    chart.region.as_str(),
                    chart.gender.code(),
                    chart.description,
                    chart.created,
                ],
            )
            .map_err(|e| conflict_on_unique(e, "size chart", &chart.key().to_string()))?;
        tracing::info!(chart = %chart.key(), "size chart created");
        Ok(())
    }

    /// Look up a chart by its (region, gender) key
    pub fn chart(&self, key: ChartKey) -> Result<SizeChart> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM size_charts WHERE region = ?1 AND gender = ?2",
                    CHART_COLUMNS
                ),
                params![key.region.as_str(), key.gender.code()],
                chart_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "size chart", &key.to_string()))
    }

    pub fn chart_by_id(&self, id: &EntityId) -> Result<SizeChart> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM size_charts WHERE id = ?1", CHART_COLUMNS),
                params![id.to_string()],
                chart_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "size chart", &id.to_string()))
    }

    /// All charts ordered by region then gender
    pub fn list_charts(&self) -> Result<Vec<SizeChart>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM size_charts ORDER BY region, gender",
            CHART_COLUMNS
        ))?;
        let charts = stmt
            .query_map([], chart_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(charts)
    }

    /// Delete a chart together with its size entries
    pub fn delete_chart(&self, key: ChartKey) -> Result<()> {
        let chart = self.chart(key)?;
        let in_use: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM custom_designs d
             JOIN size_entries s ON s.id = d.size_id
             WHERE s.chart_id = ?1",
            params![chart.id.to_string()],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(Error::validation(format!(
                "size chart {} is referenced by {} custom design(s)",
                key, in_use
            )));
        }
        self.conn.execute(
            "DELETE FROM size_charts WHERE id = ?1",
            params![chart.id.to_string()],
        )?;
        tracing::info!(chart = %key, "size chart deleted");
        Ok(())
    }

    /// Insert a size entry; the label must be unique within its chart
    pub fn insert_size_entry(&self, entry: &SizeEntry) -> Result<()> {
        let chart = self.chart_by_id(&entry.chart_id)?;
        insert_entry_row(&self.conn, &chart, entry)
    }

    /// Insert a batch of size entries in one transaction
    ///
    /// Either every entry is written or none is.
    pub fn insert_size_entries(&self, entries: &[SizeEntry]) -> Result<()> {
        let mut charts: Vec<SizeChart> = Vec::new();
        for entry in entries {
            if !charts.iter().any(|c| c.id == entry.chart_id) {
                charts.push(self.chart_by_id(&entry.chart_id)?);
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        for entry in entries {
            let chart = charts
                .iter()
                .find(|c| c.id == entry.chart_id)
                .ok_or_else(|| Error::not_found("size chart", &entry.chart_id.to_string()))?;
            insert_entry_row(&tx, chart, entry)?;
        }
        tx.commit()?;
        tracing::info!(count = entries.len(), "size entries imported");
        Ok(())
    }

    /// Entries of a chart ordered by foot length, then label
    pub fn size_entries(&self, chart_id: &EntityId) -> Result<Vec<SizeEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM size_entries WHERE chart_id = ?1",
            ENTRY_COLUMNS
        ))?;
        let mut entries = stmt
            .query_map(params![chart_id.to_string()], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        entries.sort_by(|a, b| {
            a.length_mm
                .cmp(&b.length_mm)
                .then_with(|| a.label.cmp(&b.label))
        });
        Ok(entries)
    }

    /// Look up a size entry by its label within a chart
    pub fn size_entry(&self, chart_id: &EntityId, label: &str) -> Result<Option<SizeEntry>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM size_entries WHERE chart_id = ?1 AND label = ?2",
                    ENTRY_COLUMNS
                ),
                params![chart_id.to_string(), label],
                entry_from_row,
            )
            .optional()?)
    }

    pub fn size_entry_by_id(&self, id: &EntityId) -> Result<SizeEntry> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM size_entries WHERE id = ?1", ENTRY_COLUMNS),
                params![id.to_string()],
                entry_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "size entry", &id.to_string()))
    }

    /// Resolve a `REGION-GENDER:LABEL` reference (e.g. `US-M:10`) to a size entry
    pub fn size_entry_by_ref(&self, reference: &str) -> Result<SizeEntry> {
        let (key, label) = reference.split_once(':').ok_or_else(|| {
            Error::validation(format!(
                "invalid size reference '{}', expected REGION-GENDER:LABEL",
                reference
            ))
        })?;
        let key: ChartKey = key.parse().map_err(Error::Validation)?;
        let chart = self.chart(key)?;
        self.size_entry(&chart.id, label)?
            .ok_or_else(|| Error::not_found("size entry", reference))
    }
}
