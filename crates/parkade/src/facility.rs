//! Facility: slot pools, session registry and fee rules behind `entry`/`exit`.
//!
//! This type owns:
//! - One `LotPool` per category (independent numbering from 1)
//! - The `SessionRegistry` of parked vehicles
//! - The `FeeSchedule` applied on exit
//!
//! Every operation either completes fully or leaves state untouched. The facility
//! does no I/O; callers render the returned values.

use std::fmt;

use serde::Serialize;

use crate::category::{Category, UnrecognizedCategory};
use crate::fee::{FeeSchedule, billable_hours};
use crate::pool::{LotPool, Slot};
use crate::registry::{Session, SessionRegistry, Timestamp};

/// Slot counts per category, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capacities {
    pub car: u32,
    pub motorcycle: u32,
}

impl Capacities {
    pub fn new(car: u32, motorcycle: u32) -> Self {
        Self { car, motorcycle }
    }

    pub fn of(&self, category: Category) -> u32 {
        match category {
            Category::Car => self.car,
            Category::Motorcycle => self.motorcycle,
        }
    }
}

/// A vehicle was admitted to `slot`. Displays as `Accept CarLot1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub category: Category,
    pub slot: Slot,
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accept {}Lot{}", self.category, self.slot)
    }
}

/// A vehicle left and was billed. Displays as `CarLot1 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Departure {
    pub category: Category,
    pub slot: Slot,
    pub hours: u64,
    pub fee: u64,
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Lot{} {}", self.category, self.slot, self.fee)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error(transparent)]
    UnrecognizedCategory(#[from] UnrecognizedCategory),
    #[error("no free {0} slot")]
    PoolExhausted(Category),
    #[error("vehicle '{0}' is already parked")]
    AlreadyParked(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExitError {
    #[error("vehicle '{0}' has no active session")]
    UnknownVehicle(String),
    #[error("vehicle '{vehicle_id}' exit at {exited_at} precedes entry at {entered_at}")]
    ExitBeforeEntry {
        vehicle_id: String,
        entered_at: Timestamp,
        exited_at: Timestamp,
    },
}

/// Occupancy of one category's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub category: Category,
    pub capacity: u32,
    pub available: u32,
    pub occupied: u32,
}

impl Occupancy {
    pub fn is_full(&self) -> bool {
        self.available == 0
    }
}

/// The parking facility.
#[derive(Debug)]
pub struct Facility {
    pools: [LotPool; Category::COUNT],
    sessions: SessionRegistry,
    fees: FeeSchedule,
}

impl Facility {
    pub fn new(capacities: Capacities) -> Self {
        Self {
            pools: Category::ALL.map(|c| LotPool::new(capacities.of(c))),
            sessions: SessionRegistry::new(),
            fees: FeeSchedule::default(),
        }
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Admit a vehicle of the category named by `label` into the lowest free slot.
    pub fn entry(
        &mut self,
        label: &str,
        vehicle_id: &str,
        timestamp: Timestamp,
    ) -> Result<Admission, EntryError> {
        let category = Category::resolve(label).inspect_err(|e| {
            tracing::warn!(vehicle = %vehicle_id, error = %e, "Entry rejected");
        })?;

        if self.sessions.contains(vehicle_id) {
            tracing::warn!(vehicle = %vehicle_id, "Entry rejected - vehicle already parked");
            return Err(EntryError::AlreadyParked(vehicle_id.to_string()));
        }

        let Some(slot) = self.pool_mut(category).allocate_lowest() else {
            tracing::debug!(vehicle = %vehicle_id, %category, "Entry rejected - pool exhausted");
            return Err(EntryError::PoolExhausted(category));
        };

        // Registry was checked above, so this only fails on a bug.
        if let Err(e) = self.sessions.put(Session {
            vehicle_id: vehicle_id.to_string(),
            category,
            slot,
            entered_at: timestamp,
        }) {
            tracing::error!(error = %e, "Bug: session insert failed after duplicate check");
            self.rollback_allocation(category, slot);
            return Err(EntryError::AlreadyParked(vehicle_id.to_string()));
        }

        tracing::debug!(vehicle = %vehicle_id, %category, %slot, timestamp, "Vehicle admitted");
        Ok(Admission { category, slot })
    }

    /// Release a parked vehicle's slot and compute its fee.
    ///
    /// An exit stamped earlier than the entry is refused and the session kept.
    pub fn exit(&mut self, vehicle_id: &str, timestamp: Timestamp) -> Result<Departure, ExitError> {
        let Some(session) = self.sessions.get(vehicle_id) else {
            tracing::warn!(vehicle = %vehicle_id, "Exit for vehicle with no active session");
            return Err(ExitError::UnknownVehicle(vehicle_id.to_string()));
        };

        let Some(hours) = billable_hours(session.entered_at, timestamp) else {
            tracing::warn!(
                vehicle = %vehicle_id,
                entered_at = session.entered_at,
                exited_at = timestamp,
                "Exit precedes entry - session kept"
            );
            return Err(ExitError::ExitBeforeEntry {
                vehicle_id: vehicle_id.to_string(),
                entered_at: session.entered_at,
                exited_at: timestamp,
            });
        };

        let Some(session) = self.sessions.take(vehicle_id) else {
            return Err(ExitError::UnknownVehicle(vehicle_id.to_string()));
        };
        let Session { category, slot, .. } = session;

        if let Err(e) = self.pool_mut(category).release(slot) {
            tracing::error!(vehicle = %vehicle_id, %category, error = %e, "Bug: session slot rejected by pool");
        }

        let fee = self.fees.fee(category, hours);
        tracing::debug!(vehicle = %vehicle_id, %category, %slot, hours, fee, "Vehicle departed");
        Ok(Departure {
            category,
            slot,
            hours,
            fee,
        })
    }

    /// Hand back a slot allocated by an entry that could not complete.
    fn rollback_allocation(&mut self, category: Category, slot: Slot) {
        if let Err(e) = self.pool_mut(category).release(slot) {
            tracing::error!(%category, %slot, error = %e, "Bug: rollback release rejected by pool");
        }
    }

    pub fn pool(&self, category: Category) -> &LotPool {
        &self.pools[category.index()]
    }

    fn pool_mut(&mut self, category: Category) -> &mut LotPool {
        &mut self.pools[category.index()]
    }

    pub fn session(&self, vehicle_id: &str) -> Option<&Session> {
        self.sessions.get(vehicle_id)
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn occupancy(&self) -> Vec<Occupancy> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let pool = self.pool(category);
                // sessions never exceed capacity, which is a u32
                let occupied = self.sessions.count(category) as u32;
                debug_assert_eq!(occupied, pool.in_use(), "{category} pool and sessions disagree");
                Occupancy {
                    category,
                    capacity: pool.capacity(),
                    available: pool.available(),
                    occupied,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(car: u32, motorcycle: u32) -> Facility {
        Facility::new(Capacities::new(car, motorcycle))
    }

    fn slot(n: u32) -> Slot {
        Slot::new(n).unwrap()
    }

    fn assert_conserved(facility: &Facility) {
        for category in Category::ALL {
            let pool = facility.pool(category);
            assert_eq!(
                pool.available() as usize + facility.sessions.count(category),
                pool.capacity() as usize,
                "conservation broken for {category}"
            );
        }
    }

    #[test]
    fn entry_accepts_lowest_slot() {
        let mut f = facility(3, 3);
        let admission = f.entry("car", "A", 0).unwrap();
        assert_eq!(admission.to_string(), "Accept CarLot1");

        let admission = f.entry("Car", "B", 5).unwrap();
        assert_eq!(admission.to_string(), "Accept CarLot2");
        assert_conserved(&f);
    }

    #[test]
    fn exhausted_pool_rejects() {
        let mut f = facility(1, 1);
        assert_eq!(f.entry("car", "A", 0).unwrap().to_string(), "Accept CarLot1");
        assert_eq!(
            f.entry("car", "B", 1),
            Err(EntryError::PoolExhausted(Category::Car))
        );
        assert!(f.session("B").is_none());
        assert_conserved(&f);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut f = facility(0, 0);
        assert!(matches!(f.entry("car", "A", 0), Err(EntryError::PoolExhausted(_))));
        assert!(matches!(
            f.entry("motorcycle", "B", 0),
            Err(EntryError::PoolExhausted(_))
        ));
    }

    #[test]
    fn unrecognized_category_changes_nothing() {
        let mut f = facility(2, 2);
        let err = f.entry("truck", "X", 0).unwrap_err();
        assert_eq!(
            err,
            EntryError::UnrecognizedCategory(UnrecognizedCategory("truck".to_string()))
        );
        assert!(f.session("X").is_none());
        for occupancy in f.occupancy() {
            assert_eq!(occupancy.available, 2);
        }
    }

    #[test]
    fn duplicate_entry_is_rejected_without_leaking_a_slot() {
        let mut f = facility(3, 3);
        f.entry("car", "A", 0).unwrap();

        assert_eq!(
            f.entry("motorcycle", "A", 10),
            Err(EntryError::AlreadyParked("A".to_string()))
        );
        assert_eq!(f.pool(Category::Car).available(), 2);
        assert_eq!(f.pool(Category::Motorcycle).available(), 3);
        assert_eq!(f.session("A").unwrap().entered_at, 0);
        assert_conserved(&f);
    }

    #[test]
    fn categories_number_independently() {
        let mut f = facility(2, 2);
        let car = f.entry("car", "C", 0).unwrap();
        let bike = f.entry("motorcycle", "M", 0).unwrap();
        assert_eq!(car.slot, slot(1));
        assert_eq!(bike.slot, slot(1));
        assert_eq!(bike.to_string(), "Accept MotorcycleLot1");
    }

    #[test]
    fn one_second_bills_a_full_hour() {
        let mut f = facility(1, 1);
        f.entry("car", "C", 0).unwrap();
        f.entry("motorcycle", "M", 0).unwrap();

        let car = f.exit("C", 1).unwrap();
        assert_eq!((car.hours, car.fee), (1, 2));
        assert_eq!(car.to_string(), "CarLot1 2");

        let bike = f.exit("M", 1).unwrap();
        assert_eq!((bike.hours, bike.fee), (1, 1));
        assert_eq!(bike.to_string(), "MotorcycleLot1 1");
    }

    #[test]
    fn exactly_one_hour_bills_one_hour() {
        let mut f = facility(1, 0);
        f.entry("car", "C", 0).unwrap();
        let departure = f.exit("C", 3600).unwrap();
        assert_eq!(departure.hours, 1);
        assert_eq!(departure.fee, 2);
    }

    #[test]
    fn round_trip_restores_free_set() {
        let mut f = facility(4, 1);
        f.entry("car", "A", 0).unwrap();
        f.entry("car", "B", 0).unwrap();
        f.exit("A", 10).unwrap();
        let before: Vec<_> = f.pool(Category::Car).free_slots().collect();

        f.entry("car", "Z", 20).unwrap();
        f.exit("Z", 9000).unwrap();

        let after: Vec<_> = f.pool(Category::Car).free_slots().collect();
        assert_eq!(before, after);
        assert_conserved(&f);
    }

    #[test]
    fn released_lowest_slot_is_reused_first() {
        let mut f = facility(5, 0);
        for id in ["a", "b", "c", "d", "e"] {
            f.entry("car", id, 0).unwrap();
        }
        f.exit("e", 1).unwrap();
        f.exit("c", 1).unwrap();
        f.exit("b", 1).unwrap();

        assert_eq!(f.entry("car", "x", 2).unwrap().slot, slot(2));
        assert_conserved(&f);
    }

    #[test]
    fn exit_for_unknown_vehicle_is_noop() {
        let mut f = facility(1, 1);
        f.entry("car", "A", 0).unwrap();

        assert_eq!(
            f.exit("B", 100),
            Err(ExitError::UnknownVehicle("B".to_string()))
        );
        assert_eq!(f.pool(Category::Car).available(), 0);
        assert!(f.session("A").is_some());
    }

    #[test]
    fn exit_before_entry_keeps_session() {
        let mut f = facility(1, 1);
        f.entry("car", "A", 500).unwrap();

        assert_eq!(
            f.exit("A", 499),
            Err(ExitError::ExitBeforeEntry {
                vehicle_id: "A".to_string(),
                entered_at: 500,
                exited_at: 499,
            })
        );
        assert!(f.session("A").is_some());
        assert_eq!(f.pool(Category::Car).available(), 0);

        // A later, valid exit still succeeds.
        assert_eq!(f.exit("A", 500).unwrap().fee, 0);
        assert_conserved(&f);
    }

    #[test]
    fn exit_applies_custom_fees() {
        let fees = FeeSchedule::default().with_rate(Category::Motorcycle, 3);
        let mut f = facility(1, 1).with_fees(fees);
        f.entry("motorcycle", "M", 0).unwrap();
        assert_eq!(f.exit("M", 7201).unwrap().fee, 9);
    }

    #[test]
    fn vehicle_can_reenter_after_exit() {
        let mut f = facility(1, 0);
        f.entry("car", "A", 0).unwrap();
        f.exit("A", 60).unwrap();
        assert_eq!(f.entry("car", "A", 120).unwrap().slot, slot(1));
    }

    #[test]
    fn conservation_holds_through_mixed_traffic() {
        let mut f = facility(3, 2);
        let _ = f.entry("car", "1", 0);
        let _ = f.entry("motorcycle", "2", 0);
        let _ = f.entry("car", "3", 5);
        let _ = f.entry("bus", "4", 5);
        let _ = f.entry("motorcycle", "5", 9);
        let _ = f.entry("motorcycle", "6", 9);
        assert_conserved(&f);
        let _ = f.exit("2", 100);
        let _ = f.exit("nobody", 100);
        let _ = f.entry("car", "7", 110);
        let _ = f.entry("car", "8", 110);
        let _ = f.exit("3", 20);
        assert_conserved(&f);
    }

    #[test]
    fn occupancy_snapshot() {
        let mut f = facility(2, 1);
        f.entry("car", "A", 0).unwrap();
        f.entry("motorcycle", "M", 0).unwrap();

        let occupancy = f.occupancy();
        assert!(!occupancy[0].is_full());
        assert!(occupancy[1].is_full());
        insta::assert_json_snapshot!(occupancy, @r#"
        [
          {
            "category": "Car",
            "capacity": 2,
            "available": 1,
            "occupied": 1
          },
          {
            "category": "Motorcycle",
            "capacity": 1,
            "available": 0,
            "occupied": 1
          }
        ]
        "#);
    }

    #[test]
    fn rollback_returns_slot_and_tolerates_bad_release() {
        let mut f = facility(2, 0);
        let slot = f.pool_mut(Category::Car).allocate_lowest().unwrap();

        f.rollback_allocation(Category::Car, slot);
        assert!(f.pool(Category::Car).is_free(slot));

        // Already free: logged, pool unchanged.
        f.rollback_allocation(Category::Car, slot);
        assert_eq!(f.pool(Category::Car).available(), 2);
        f.rollback_allocation(Category::Car, Slot::new(9).unwrap());
        assert_eq!(f.pool(Category::Car).available(), 2);
    }

    #[test]
    fn occupancy_tracks_sessions_through_exits() {
        let mut f = facility(3, 2);
        f.entry("car", "A", 0).unwrap();
        f.entry("car", "B", 0).unwrap();
        f.entry("motorcycle", "M", 0).unwrap();
        f.exit("A", 10).unwrap();
        let _ = f.exit("ghost", 10);
        let _ = f.entry("car", "M", 5);

        for occupancy in f.occupancy() {
            assert_eq!(occupancy.occupied as usize, f.sessions.count(occupancy.category));
            assert_eq!(occupancy.available + occupancy.occupied, occupancy.capacity);
        }
        assert_eq!(f.occupancy()[0].occupied, 1);
        assert_eq!(f.occupancy()[1].occupied, 1);
    }

    #[test]
    fn departure_serializes_with_fee_and_hours() {
        let departure = Departure {
            category: Category::Car,
            slot: slot(3),
            hours: 2,
            fee: 4,
        };
        insta::assert_json_snapshot!(departure, @r#"
        {
          "category": "Car",
          "slot": 3,
          "hours": 2,
          "fee": 4
        }
        "#);
    }
}
