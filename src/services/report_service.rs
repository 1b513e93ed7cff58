// src/services/report_service.rs

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::{
    common::error::AppError,
    db::BatchRepository,
    models::report::{Report, ReportKind, ReportParams, ReportPeriod, ReportRange},
    services::{
        aggregation::report_summary,
        dashboard_service::DashboardService,
        presentation::report_table,
        settings_service::SettingsService,
    },
};

#[derive(Clone)]
pub struct ReportService {
    repo: BatchRepository,
    dashboard: DashboardService,
    settings: SettingsService,
    utc_offset: FixedOffset,
}

fn invalid(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>, AppError> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| invalid("Invalid date."))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| invalid("Invalid date."))
}

/// Converte datas locais inclusivas em `[início 00:00, dia seguinte ao fim 00:00)` em UTC.
pub fn local_day_bounds(
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let after_end = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| invalid("Invalid end date."))?;
    Ok((local_midnight(start, offset)?, local_midnight(after_end, offset)?))
}

pub fn period_range(period: ReportPeriod, today: NaiveDate) -> Result<ReportRange, AppError> {
    let bad_period = || invalid("Invalid report period.");

    let (start, end) = match period {
        ReportPeriod::Today => (today, today),
        ReportPeriod::ThisWeek => {
            // Semana de domingo a sábado
            let back = u64::from(today.weekday().num_days_from_sunday());
            let start = today.checked_sub_days(Days::new(back)).ok_or_else(bad_period)?;
            let end = start.checked_add_days(Days::new(6)).ok_or_else(bad_period)?;
            (start, end)
        }
        ReportPeriod::ThisMonth => {
            let start = today.with_day(1).ok_or_else(bad_period)?;
            let next_month = start.checked_add_months(chrono::Months::new(1)).ok_or_else(bad_period)?;
            let end = next_month.pred_opt().ok_or_else(bad_period)?;
            (start, end)
        }
        ReportPeriod::ThisYear => (
            NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(bad_period)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31).ok_or_else(bad_period)?,
        ),
    };

    Ok(ReportRange { start, end })
}

/// Valida os parâmetros antes de qualquer consulta.
pub fn resolve_range(params: &ReportParams, today: NaiveDate) -> Result<ReportRange, AppError> {
    match (params.start, params.end, params.period) {
        (Some(start), Some(end), _) => {
            if start > end {
                return Err(invalid("Start date must be on or before the end date."));
            }
            Ok(ReportRange { start, end })
        }
        (None, None, Some(period)) => period_range(period, today),
        _ => Err(invalid("Please select both a start and end date.")),
    }
}

impl ReportService {
    pub fn new(
        repo: BatchRepository,
        dashboard: DashboardService,
        settings: SettingsService,
        utc_offset: FixedOffset,
    ) -> Self {
        Self { repo, dashboard, settings, utc_offset }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    /// Relatório da tela. Falha ao buscar os lotes vira relatório vazio (só log).
    pub async fn generate(&self, params: &ReportParams) -> Result<Report, AppError> {
        self.build(params, false).await
    }

    /// Relatório para exportação: erro de banco sobe como erro, nunca como
    /// arquivo "sem dados".
    pub async fn generate_for_export(&self, params: &ReportParams) -> Result<Report, AppError> {
        self.build(params, true).await
    }

    async fn build(&self, params: &ReportParams, strict: bool) -> Result<Report, AppError> {
        let kind = params.kind.unwrap_or_default();
        let range = resolve_range(params, self.today())?;
        let (from, to) = local_day_bounds(range.start, range.end, self.utc_offset)?;

        let listed = match kind {
            ReportKind::Batches => self.repo.list_active_created_between(from, to).await,
            ReportKind::Sales => self.repo.list_sold_between(from, to).await,
        };
        let batches = match listed {
            Ok(batches) => batches,
            Err(e) if !strict => {
                tracing::error!("Erro ao buscar dados do relatório ({}): {:?}", kind.slug(), e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let selling_price = self.settings.selling_price().await;
        let rows = if strict {
            self.dashboard.try_aggregate_all(&batches, selling_price).await?
        } else {
            self.dashboard.aggregate_all(batches, selling_price).await
        };

        tracing::info!(
            "Relatório {} de {} a {}: {} lote(s)",
            kind.slug(),
            range.start,
            range.end,
            rows.len()
        );

        Ok(Report {
            kind,
            range,
            selling_price,
            table: report_table(kind, &rows, self.utc_offset),
            summary: report_summary(&rows),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    // Mesmo predicado das consultas: created_at >= $1 AND created_at < $2
    fn range_contains(range: ReportRange, at: DateTime<Utc>, offset: FixedOffset) -> Result<bool, AppError> {
        let (from, to) = local_day_bounds(range.start, range.end, offset)?;
        Ok(at >= from && at < to)
    }

    fn params(start: Option<NaiveDate>, end: Option<NaiveDate>, period: Option<ReportPeriod>) -> ReportParams {
        ReportParams { kind: None, start, end, period }
    }

    #[test]
    fn boundaries_are_inclusive_to_the_millisecond() {
        let offset = manila();
        let range = ReportRange { start: date(2026, 3, 1), end: date(2026, 3, 31) };

        let start = offset.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap().with_timezone(&Utc);
        let end = offset.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap().with_timezone(&Utc)
            + Duration::milliseconds(999);

        assert!(range_contains(range, start, offset).unwrap());
        assert!(range_contains(range, end, offset).unwrap());
        assert!(!range_contains(range, start - Duration::milliseconds(1), offset).unwrap());
        assert!(!range_contains(range, end + Duration::milliseconds(1), offset).unwrap());
    }

    #[test]
    fn bounds_follow_the_local_offset() {
        let (from, to) = local_day_bounds(date(2026, 1, 1), date(2026, 1, 1), manila()).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 12, 31, 16, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 16, 0, 0).unwrap());
    }

    #[test]
    fn start_after_end_is_rejected() {
        let err = resolve_range(&params(Some(date(2026, 5, 2)), Some(date(2026, 5, 1)), None), date(2026, 5, 1))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(m) if m.contains("on or before")));
    }

    #[test]
    fn missing_dates_are_rejected() {
        let today = date(2026, 5, 1);
        assert!(matches!(
            resolve_range(&params(Some(today), None, None), today),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_range(&params(None, None, None), today),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn same_day_range_is_valid() {
        let day = date(2026, 5, 1);
        let range = resolve_range(&params(Some(day), Some(day), Some(ReportPeriod::ThisYear)), day).unwrap();
        assert_eq!(range, ReportRange { start: day, end: day });
    }

    #[test]
    fn period_presets() {
        // 2026-10-14 é uma quarta-feira
        let today = date(2026, 10, 14);
        assert_eq!(
            period_range(ReportPeriod::Today, today).unwrap(),
            ReportRange { start: today, end: today }
        );
        assert_eq!(
            period_range(ReportPeriod::ThisWeek, today).unwrap(),
            ReportRange { start: date(2026, 10, 11), end: date(2026, 10, 17) }
        );
        assert_eq!(
            period_range(ReportPeriod::ThisMonth, date(2028, 2, 10)).unwrap(),
            ReportRange { start: date(2028, 2, 1), end: date(2028, 2, 29) }
        );
        assert_eq!(
            period_range(ReportPeriod::ThisYear, today).unwrap(),
            ReportRange { start: date(2026, 1, 1), end: date(2026, 12, 31) }
        );
        assert_eq!(
            resolve_range(&params(None, None, Some(ReportPeriod::ThisMonth)), date(2026, 12, 31)).unwrap(),
            ReportRange { start: date(2026, 12, 1), end: date(2026, 12, 31) }
        );
    }
}
