//! Employee operations.

use chrono::Utc;
use uuid::Uuid;

use super::{PointsStore, Tables};
use crate::error::{PointsError, PointsResult};
use crate::models::{Employee, EmployeeUpdate, NewEmployee, TargetScope};

impl PointsStore {
    /// Creates an employee in an existing department.
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed number, name or email
    /// - `NotFound` if the department doesn't exist
    /// - `DuplicateEmployeeNumber` if the number is taken
    pub fn create_employee(&self, new: NewEmployee) -> PointsResult<Employee> {
        new.validate()?;
        let mut tables = self.write()?;

        tables.department(new.department_id)?;
        ensure_unique_number(&tables, &new.employee_number, None)?;

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            employee_number: new.employee_number,
            full_name: new.full_name.trim().to_string(),
            email: new.email,
            department_id: new.department_id,
            position: new.position,
            hire_date: new.hire_date,
            active: new.active,
            created_at: now,
            updated_at: now,
        };
        tables.employees.insert(employee.id, employee.clone());

        tracing::info!(
            employee_id = %employee.id,
            employee_number = %employee.employee_number,
            "Employee created"
        );
        Ok(employee)
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: Uuid) -> PointsResult<Employee> {
        self.read()?.employee(id).cloned()
    }

    /// Looks up an employee by employee number.
    pub fn employee_by_number(&self, employee_number: &str) -> PointsResult<Employee> {
        self.read()?
            .employees
            .values()
            .find(|e| e.employee_number == employee_number)
            .cloned()
            .ok_or_else(|| PointsError::not_found("Employee", employee_number))
    }

    /// Lists employees by employee number, optionally filtered by
    /// department and active flag.
    pub fn list_employees(
        &self,
        department_id: Option<Uuid>,
        active: Option<bool>,
    ) -> PointsResult<Vec<Employee>> {
        let tables = self.read()?;
        let mut employees: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| department_id.is_none_or(|d| e.department_id == d))
            .filter(|e| active.is_none_or(|a| e.active == a))
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
        Ok(employees)
    }

    /// Applies a partial update to an employee.
    pub fn update_employee(&self, id: Uuid, update: EmployeeUpdate) -> PointsResult<Employee> {
        update.validate()?;
        let mut tables = self.write()?;
        tables.employee(id)?;

        if let Some(department_id) = update.department_id {
            tables.department(department_id)?;
        }
        if let Some(number) = &update.employee_number {
            ensure_unique_number(&tables, number, Some(id))?;
        }

        let employee = tables
            .employees
            .get_mut(&id)
            .ok_or_else(|| PointsError::not_found("Employee", id))?;
        if let Some(number) = update.employee_number {
            employee.employee_number = number;
        }
        if let Some(name) = update.full_name {
            employee.full_name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            employee.email = email;
        }
        if let Some(department_id) = update.department_id {
            employee.department_id = department_id;
        }
        if let Some(position) = update.position {
            employee.position = position;
        }
        if let Some(active) = update.active {
            employee.active = active;
        }
        employee.updated_at = Utc::now();
        Ok(employee.clone())
    }

    /// Deletes an employee with their work logs, attachments, points,
    /// notifications and employee-scoped targets.
    pub fn delete_employee(&self, id: Uuid) -> PointsResult<()> {
        let mut tables = self.write()?;
        tables.employee(id)?;

        let tables = &mut *tables;
        let work_log_ids: Vec<Uuid> = tables
            .work_logs
            .values()
            .filter(|w| w.employee_id == id)
            .map(|w| w.id)
            .collect();
        tables
            .attachments
            .retain(|_, a| !work_log_ids.contains(&a.work_log_id));
        tables.work_logs.retain(|_, w| w.employee_id != id);
        tables.points.retain(|_, p| p.employee_id != id);
        tables.notifications.retain(|_, n| n.recipient_id != id);
        tables
            .targets
            .retain(|_, t| t.scope != TargetScope::Employee(id));
        tables.employees.remove(&id);

        tracing::info!(
            employee_id = %id,
            work_logs = work_log_ids.len(),
            "Employee deleted"
        );
        Ok(())
    }
}

fn ensure_unique_number(tables: &Tables, number: &str, except: Option<Uuid>) -> PointsResult<()> {
    let taken = tables
        .employees
        .values()
        .any(|e| Some(e.id) != except && e.employee_number == number);
    if taken {
        return Err(PointsError::DuplicateEmployeeNumber {
            employee_number: number.to_string(),
        });
    }
    Ok(())
}
