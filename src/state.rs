use crate::{
    billing::BillingRates,
    db::{DbPool, OrmConn, create_orm_conn, create_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub billing: BillingRates,
}

impl AppState {
    pub async fn connect(database_url: &str, billing: BillingRates) -> anyhow::Result<Self> {
        let pool = create_pool(database_url).await?;
        let orm = create_orm_conn(database_url).await?;
        Ok(Self { pool, orm, billing })
    }
}
