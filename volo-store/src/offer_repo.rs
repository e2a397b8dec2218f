use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use volo_core::repository::{OfferRepository, RepoResult};
use volo_core::search::DiscountStats;
use volo_shared::{CruiseOffer, FlightOffer, OfferKind};

pub struct PostgresOfferRepository {
    pool: PgPool,
}

impl PostgresOfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table(kind: OfferKind) -> &'static str {
    match kind {
        OfferKind::Flight => "flight_offers",
        OfferKind::Cruise => "cruise_offers",
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    source_api: String,
    search_id: Uuid,
    departure_airport: String,
    arrival_airport: String,
    departure_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    airline: String,
    flight_number: String,
    original_price: f64,
    current_price: f64,
    discount_percentage: f64,
    stops: i32,
    duration_minutes: i32,
    booking_link: String,
    is_authentic: bool,
    validation_timestamp: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<FlightRow> for FlightOffer {
    fn from(row: FlightRow) -> Self {
        FlightOffer {
            id: row.id,
            source_api: row.source_api,
            search_id: row.search_id,
            departure_airport: row.departure_airport,
            arrival_airport: row.arrival_airport,
            departure_date: row.departure_date,
            return_date: row.return_date,
            airline: row.airline,
            flight_number: row.flight_number,
            original_price: row.original_price,
            current_price: row.current_price,
            discount_percentage: row.discount_percentage,
            stops: row.stops,
            duration_minutes: row.duration_minutes,
            booking_link: row.booking_link,
            is_authentic: row.is_authentic,
            validation_timestamp: row.validation_timestamp,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CruiseRow {
    id: Uuid,
    source_api: String,
    search_id: Uuid,
    cruise_line: String,
    ship_name: String,
    departure_port: String,
    departure_date: DateTime<Utc>,
    duration_nights: i32,
    original_price: f64,
    current_price: f64,
    discount_percentage: f64,
    cabin_type: String,
    booking_link: String,
    is_authentic: bool,
    validation_timestamp: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<CruiseRow> for CruiseOffer {
    fn from(row: CruiseRow) -> Self {
        CruiseOffer {
            id: row.id,
            source_api: row.source_api,
            search_id: row.search_id,
            cruise_line: row.cruise_line,
            ship_name: row.ship_name,
            departure_port: row.departure_port,
            departure_date: row.departure_date,
            duration_nights: row.duration_nights,
            original_price: row.original_price,
            current_price: row.current_price,
            discount_percentage: row.discount_percentage,
            cabin_type: row.cabin_type,
            booking_link: row.booking_link,
            is_authentic: row.is_authentic,
            validation_timestamp: row.validation_timestamp,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    avg_discount: Option<f64>,
    max_discount: Option<f64>,
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn insert_flights(&self, offers: &[FlightOffer]) -> RepoResult<u64> {
        if offers.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO flight_offers (id, source_api, search_id, departure_airport, arrival_airport, \
             departure_date, return_date, airline, flight_number, original_price, current_price, \
             discount_percentage, stops, duration_minutes, booking_link, is_authentic, \
             validation_timestamp, created_at) ",
        );
        builder.push_values(offers, |mut b, o| {
            b.push_bind(o.id)
                .push_bind(&o.source_api)
                .push_bind(o.search_id)
                .push_bind(&o.departure_airport)
                .push_bind(&o.arrival_airport)
                .push_bind(o.departure_date)
                .push_bind(o.return_date)
                .push_bind(&o.airline)
                .push_bind(&o.flight_number)
                .push_bind(o.original_price)
                .push_bind(o.current_price)
                .push_bind(o.discount_percentage)
                .push_bind(o.stops)
                .push_bind(o.duration_minutes)
                .push_bind(&o.booking_link)
                .push_bind(o.is_authentic)
                .push_bind(o.validation_timestamp)
                .push_bind(o.created_at);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert_cruises(&self, offers: &[CruiseOffer]) -> RepoResult<u64> {
        if offers.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO cruise_offers (id, source_api, search_id, cruise_line, ship_name, \
             departure_port, departure_date, duration_nights, original_price, current_price, \
             discount_percentage, cabin_type, booking_link, is_authentic, validation_timestamp, \
             created_at) ",
        );
        builder.push_values(offers, |mut b, o| {
            b.push_bind(o.id)
                .push_bind(&o.source_api)
                .push_bind(o.search_id)
                .push_bind(&o.cruise_line)
                .push_bind(&o.ship_name)
                .push_bind(&o.departure_port)
                .push_bind(o.departure_date)
                .push_bind(o.duration_nights)
                .push_bind(o.original_price)
                .push_bind(o.current_price)
                .push_bind(o.discount_percentage)
                .push_bind(&o.cabin_type)
                .push_bind(&o.booking_link)
                .push_bind(o.is_authentic)
                .push_bind(o.validation_timestamp)
                .push_bind(o.created_at);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_flights(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<FlightOffer>> {
        let rows = sqlx::query_as::<_, FlightRow>(
            r#"
            SELECT id, source_api, search_id, departure_airport, arrival_airport, departure_date,
                   return_date, airline, flight_number, original_price, current_price,
                   discount_percentage, stops, duration_minutes, booking_link, is_authentic,
                   validation_timestamp, created_at
            FROM flight_offers
            WHERE discount_percentage >= $1
            ORDER BY discount_percentage DESC
            LIMIT $2
            "#,
        )
        .bind(min_discount)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FlightOffer::from).collect())
    }

    async fn find_cruises(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<CruiseOffer>> {
        let rows = sqlx::query_as::<_, CruiseRow>(
            r#"
            SELECT id, source_api, search_id, cruise_line, ship_name, departure_port, departure_date,
                   duration_nights, original_price, current_price, discount_percentage, cabin_type,
                   booking_link, is_authentic, validation_timestamp, created_at
            FROM cruise_offers
            WHERE discount_percentage >= $1
            ORDER BY discount_percentage DESC
            LIMIT $2
            "#,
        )
        .bind(min_discount)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CruiseOffer::from).collect())
    }

    async fn count(&self, kind: OfferKind) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table(kind));
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn discount_stats(&self, kind: OfferKind) -> RepoResult<DiscountStats> {
        let sql = format!(
            "SELECT AVG(discount_percentage) AS avg_discount, MAX(discount_percentage) AS max_discount FROM {}",
            table(kind)
        );
        let row = sqlx::query_as::<_, StatsRow>(&sql).fetch_one(&self.pool).await?;

        Ok(DiscountStats {
            avg: row.avg_discount,
            max: row.max_discount,
        })
    }

    async fn delete_older_than(&self, kind: OfferKind, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let sql = format!("DELETE FROM {} WHERE created_at < $1", table(kind));
        let result = sqlx::query(&sql).bind(cutoff).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
