/// Analytics handlers - per-day like totals over a date range
use actix_web::{web, HttpResponse};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::services::EngagementService;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// GET /analytics/?date_from=YYYY-MM-DD&date_to=YYYY-MM-DD
pub async fn get_analytics(
    pool: web::Data<PgPool>,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse> {
    let (Some(date_from), Some(date_to)) = (query.date_from.as_deref(), query.date_to.as_deref())
    else {
        return Err(AppError::BadRequest(
            "Both date_from and date_to are required".to_string(),
        ));
    };

    let from = parse_date(date_from)?;
    let to = parse_date(date_to)?;

    // date_to names a whole day, so the exclusive bound is the next one
    let to_exclusive = to + Duration::days(1);

    let service = EngagementService::new(pool.get_ref().clone());
    let entries = service.likes_per_day(from, to_exclusive).await?;

    Ok(HttpResponse::Ok().json(entries))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("29-02-2024").is_err());
        assert!(parse_date("2024/02/29").is_err());
        assert!(parse_date("").is_err());
    }
}
