//! Batched lookups for the display fields that list projections add
//! (vehicle labels, customer and technician names, per-row counts).
//!
//! Every helper takes the full id list of a page and issues one query, so a
//! page costs a fixed number of round trips however many rows it holds.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect, Select,
};

use crate::{
    entity::{
        Customers, Parts, Suppliers, Technicians, Vehicles, customers, parts, suppliers,
        technicians, vehicles,
    },
    error::AppResult,
    models::CustomerContact,
};

/// Vehicle label plus the owning customer, for rows that point at a vehicle.
#[derive(Debug, Clone)]
pub struct VehicleOwner {
    pub vehicle_info: String,
    pub customer: Option<customers::Model>,
}

impl VehicleOwner {
    pub fn customer_name(&self) -> Option<String> {
        self.customer.as_ref().map(|c| c.full_name.clone())
    }

    pub fn contact(&self) -> Option<CustomerContact> {
        self.customer.as_ref().map(contact_from_entity)
    }
}

pub fn contact_from_entity(customer: &customers::Model) -> CustomerContact {
    CustomerContact {
        full_name: customer.full_name.clone(),
        national_id: customer.national_id.clone(),
        phone: customer.phone.clone(),
        email: customer.email.clone(),
        address: customer.address.clone(),
        contact_person: customer.contact_person.clone(),
    }
}

fn unique(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub async fn vehicle_owners<C>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> AppResult<HashMap<i32, VehicleOwner>>
where
    C: ConnectionTrait,
{
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Vehicles::find()
        .filter(vehicles::Column::Id.is_in(ids))
        .find_also_related(Customers)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(vehicle, customer)| {
            let owner = VehicleOwner {
                vehicle_info: vehicle.label(),
                customer,
            };
            (vehicle.id, owner)
        })
        .collect())
}

pub async fn customer_names<C>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> AppResult<HashMap<i32, String>>
where
    C: ConnectionTrait,
{
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Customers::find()
        .filter(customers::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|c| (c.id, c.full_name)).collect())
}

pub async fn technician_names<C>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> AppResult<HashMap<i32, String>>
where
    C: ConnectionTrait,
{
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Technicians::find()
        .filter(technicians::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|t| (t.id, t.name)).collect())
}

pub async fn suppliers_by_id<C>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> AppResult<HashMap<i32, suppliers::Model>>
where
    C: ConnectionTrait,
{
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Suppliers::find()
        .filter(suppliers::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|s| (s.id, s)).collect())
}

pub async fn part_names<C>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> AppResult<HashMap<i32, String>>
where
    C: ConnectionTrait,
{
    let ids = unique(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Parts::find()
        .filter(parts::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|p| (p.id, p.name)).collect())
}

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    key: i32,
    count: i64,
}

/// Row counts of `select`, grouped by the integer column `key`.
///
/// Keys with no rows are absent from the map.
pub async fn counts_by<E, C>(
    conn: &C,
    select: Select<E>,
    key: E::Column,
) -> AppResult<HashMap<i32, i64>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let rows = select
        .select_only()
        .column_as(key, "key")
        .column_as(key.count(), "count")
        .group_by(key)
        .into_model::<GroupCount>()
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| (row.key, row.count)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_sorts_and_dedups() {
        assert_eq!(unique([3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(unique(Vec::<i32>::new()).is_empty());
    }

    #[tokio::test]
    async fn empty_id_lists_skip_the_database() {
        let conn = sea_orm::DatabaseConnection::Disconnected;
        assert!(vehicle_owners(&conn, []).await.unwrap().is_empty());
        assert!(technician_names(&conn, []).await.unwrap().is_empty());
        assert!(suppliers_by_id(&conn, []).await.unwrap().is_empty());
    }
}
