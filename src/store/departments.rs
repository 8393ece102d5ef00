//! Department operations.

use chrono::Utc;
use uuid::Uuid;

use super::{PointsStore, Tables};
use crate::error::{PointsError, PointsResult};
use crate::models::{Department, DepartmentUpdate, NewDepartment, TargetScope};

impl PointsStore {
    /// Creates a department. Names are unique ignoring case.
    pub fn create_department(&self, new: NewDepartment) -> PointsResult<Department> {
        new.validate()?;
        let mut tables = self.write()?;

        let name = new.name.trim().to_string();
        ensure_unique_name(&tables, &name, None)?;

        let now = Utc::now();
        let department = Department {
            id: Uuid::new_v4(),
            name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables
            .departments
            .insert(department.id, department.clone());

        tracing::info!(department_id = %department.id, name = %department.name, "Department created");
        Ok(department)
    }

    /// Looks up a department.
    pub fn department(&self, id: Uuid) -> PointsResult<Department> {
        self.read()?.department(id).cloned()
    }

    /// Lists all departments by name.
    pub fn list_departments(&self) -> PointsResult<Vec<Department>> {
        let tables = self.read()?;
        let mut departments: Vec<Department> = tables.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    /// Applies a partial update to a department.
    pub fn update_department(&self, id: Uuid, update: DepartmentUpdate) -> PointsResult<Department> {
        update.validate()?;
        let mut tables = self.write()?;
        tables.department(id)?;

        let name = update.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            ensure_unique_name(&tables, name, Some(id))?;
        }

        let department = tables
            .departments
            .get_mut(&id)
            .ok_or_else(|| PointsError::not_found("Department", id))?;
        if let Some(name) = name {
            department.name = name;
        }
        if let Some(description) = update.description {
            department.description = description;
        }
        department.updated_at = Utc::now();
        Ok(department.clone())
    }

    /// Deletes a department and its department-scoped targets.
    ///
    /// Rejected with `ReferentialIntegrity` while any employee still belongs
    /// to the department.
    pub fn delete_department(&self, id: Uuid) -> PointsResult<()> {
        let mut tables = self.write()?;
        tables.department(id)?;

        let members = tables
            .employees
            .values()
            .filter(|e| e.department_id == id)
            .count();
        if members > 0 {
            return Err(PointsError::ReferentialIntegrity {
                message: format!("department '{}' still has {} employee(s)", id, members),
            });
        }

        tables
            .targets
            .retain(|_, t| t.scope != TargetScope::Department(id));
        tables.departments.remove(&id);

        tracing::info!(department_id = %id, "Department deleted");
        Ok(())
    }
}

fn ensure_unique_name(tables: &Tables, name: &str, except: Option<Uuid>) -> PointsResult<()> {
    let taken = tables
        .departments
        .values()
        .any(|d| Some(d.id) != except && d.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(PointsError::DuplicateDepartment {
            name: name.to_string(),
        });
    }
    Ok(())
}
