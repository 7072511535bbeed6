//! Staff Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Staff, StaffCreate, StaffUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Staff>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM staff ORDER BY created_at DESC")
            .await?;
        let staff: Vec<Staff> = result.take(0)?;
        Ok(staff)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Staff> {
        let record = parse_id("staff", id)?;
        let staff: Option<Staff> = self.base.db().select(record).await?;
        staff.ok_or_else(|| RepoError::NotFound(format!("Staff not found: {id}")))
    }

    pub async fn create(&self, data: StaffCreate) -> RepoResult<Staff> {
        if data.salary.is_some_and(|s| s.is_sign_negative()) {
            return Err(RepoError::Validation("salary must not be negative".into()));
        }
        let now = now_millis();
        let staff = Staff {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            gender: data.gender,
            role: data.role.unwrap_or_default(),
            department: data.department.unwrap_or_default(),
            salary: data.salary.unwrap_or_default(),
            salary_due_date: data.salary_due_date,
            status: data.status.unwrap_or_default(),
            shift_schedule: data.shift_schedule.unwrap_or_default(),
            image: data.image,
            notes: data.notes,
            joining_date: data.joining_date.unwrap_or(now),
            created_at: now,
        };
        let created: Option<Staff> = self.base.db().create("staff").content(staff).await?;
        created.ok_or_else(|| RepoError::Database("Staff creation returned no record".to_string()))
    }

    pub async fn update(&self, id: &str, data: StaffUpdate) -> RepoResult<Staff> {
        if data.salary.is_some_and(|s| s.is_sign_negative()) {
            return Err(RepoError::Validation("salary must not be negative".into()));
        }
        let record = parse_id("staff", id)?;
        let updated: Option<Staff> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Staff not found: {id}")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Staff> {
        let record = parse_id("staff", id)?;
        let deleted: Option<Staff> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Staff not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::{DaySchedule, StaffStatus, TimeSlot, Weekday};

    #[tokio::test]
    async fn schedule_round_trip_and_duplicate_email() {
        let db = memory_db().await;
        let repo = StaffRepository::new(db);

        let created = repo
            .create(StaffCreate {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
                phone: None,
                address: None,
                gender: None,
                role: None,
                department: None,
                salary: None,
                salary_due_date: 1_700_000_000_000,
                status: None,
                shift_schedule: Some(vec![DaySchedule {
                    day: Weekday::Monday,
                    time_slots: vec![TimeSlot {
                        start: "09:00".into(),
                        end: "17:00".into(),
                    }],
                }]),
                image: None,
                notes: None,
                joining_date: None,
            })
            .await
            .unwrap();
        assert_eq!(created.status, StaffStatus::Active);
        assert_eq!(created.shift_schedule.len(), 1);
        assert_eq!(created.shift_schedule[0].time_slots[0].start, "09:00");

        let err = repo
            .create(StaffCreate {
                name: "Ravi Two".into(),
                email: "ravi@example.com".into(),
                phone: None,
                address: None,
                gender: None,
                role: None,
                department: None,
                salary: None,
                salary_due_date: 1_700_000_000_000,
                status: None,
                shift_schedule: None,
                image: None,
                notes: None,
                joining_date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
