use std::path::Path;

use tinydb::catalog::database::{DEPARTMENTS, EMPLOYEES, EMPLOYEES_PROJECTS, PROJECTS};
use tinydb::executor::{AggregateOp, AggregateResult};
use tinydb::storage::{CsvFileStore, Row};
use tinydb::table::{
    DepartmentTable, EmployeeProjectTable, EmployeeTable, ProjectTable, Selection, Separator,
    Table,
};
use tinydb::{Database, DatabaseConfig, Error};

/// Database with the four standard tables bound to files in `dir`, empty
fn database(dir: &Path) -> Database {
    let config = DatabaseConfig::new().data_dir(dir).load_existing(false);
    Database::open(&config).unwrap()
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn insert_all(db: &mut Database, table: &str, sep: Separator, rows: &[&str]) {
    for raw in rows {
        db.insert(table, raw, sep).unwrap();
    }
}

fn seed_employees(db: &mut Database) {
    insert_all(
        db,
        EMPLOYEES,
        Separator::Space,
        &[
            "1 John 28 50000 1",
            "2 Jane 34 60000 2",
            "3 Alice 29 45000 3",
            "4 Bob 40 70000 4",
            "5 Charlie 25 40000 5",
        ],
    );
}

#[test]
fn test_insert_select_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    seed_employees(&mut db);

    let rows = db
        .select(EMPLOYEES, &Selection::IdRange { start: 1, end: 5 })
        .unwrap()
        .unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(
        rows[0],
        row(&[
            ("id", "1"),
            ("name", "John"),
            ("age", "28"),
            ("salary", "50000"),
            ("department_id", "1"),
        ])
    );
}

#[test]
fn test_rejected_rows_leave_table_and_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    db.insert(EMPLOYEES, "1 John 28 50000 1", Separator::Space)
        .unwrap();

    let path = dir.path().join("employee_table.csv");
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(db
        .insert(EMPLOYEES, "1 Jane 34 60000 2", Separator::Space)
        .unwrap_err()
        .is_uniqueness());
    assert!(db
        .insert(EMPLOYEES, "2 Jane 34 60000 1", Separator::Space)
        .unwrap_err()
        .is_uniqueness());
    assert!(db
        .insert(EMPLOYEES, "2 Jane 34", Separator::Space)
        .unwrap_err()
        .is_schema());

    assert_eq!(db.table(EMPLOYEES).unwrap().rows().len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_project_date_rules() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());

    db.insert(PROJECTS, "1,Website Redesign,2024-01-15,2024-03-15", Separator::Space)
        .unwrap();
    for raw in [
        "2,Backwards,2024-08-01,2024-02-01",
        "3,No Such Day,2024-04-31,2024-05-01",
        "4,No Such Month,2024-00-10,2024-05-01",
    ] {
        let err = db.insert(PROJECTS, raw, Separator::Comma).unwrap_err();
        assert!(err.is_schema(), "{}: {}", raw, err);
    }
    assert_eq!(db.table(PROJECTS).unwrap().rows().len(), 1);
}

#[test]
fn test_join_example() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    db.insert(EMPLOYEES, "1 John 28 50000 1", Separator::Space)
        .unwrap();
    db.insert(DEPARTMENTS, "1 HR", Separator::Space).unwrap();

    let rows = db
        .join(
            &[EMPLOYEES, DEPARTMENTS],
            &[vec!["employees.department_id", "departments.id"]],
        )
        .unwrap();

    assert_eq!(
        rows,
        vec![row(&[
            ("employees.id", "1"),
            ("employees.name", "John"),
            ("employees.age", "28"),
            ("employees.salary", "50000"),
            ("employees.department_id", "1"),
            ("departments.id", "1"),
            ("departments.department_name", "HR"),
        ])]
    );
}

#[test]
fn test_join_validation() {
    let dir = tempfile::tempdir().unwrap();
    let db = database(dir.path());

    let cases: Vec<(Vec<&str>, Vec<Vec<&str>>)> = vec![
        (vec![EMPLOYEES], vec![]),
        (
            vec![EMPLOYEES, DEPARTMENTS],
            vec![vec!["department_id", "departments.id"]],
        ),
        (
            vec![EMPLOYEES, DEPARTMENTS],
            vec![vec!["employees.department_id", "offices.id"]],
        ),
        (
            vec![EMPLOYEES, DEPARTMENTS],
            vec![vec!["employees.office_id", "departments.id"]],
        ),
        (
            vec![EMPLOYEES, "offices"],
            vec![vec!["employees.department_id", "offices.id"]],
        ),
        (
            vec![EMPLOYEES, DEPARTMENTS, PROJECTS],
            vec![vec!["employees.department_id", "departments.id"]],
        ),
    ];

    for (tables, attrs) in cases {
        let err = db.join(&tables[..], &attrs[..]).unwrap_err();
        assert!(err.is_validation(), "{:?}: {}", tables, err);
    }
}

#[test]
fn test_aggregation_examples() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    seed_employees(&mut db);

    let value = |column: &str, op: AggregateOp| -> String {
        let result = db.aggregate(EMPLOYEES, column, op, None).unwrap();
        result.single().unwrap()[&op.result_key(column)].clone()
    };

    assert_eq!(value("salary", AggregateOp::Avg), "53000.0");
    assert_eq!(value("salary", AggregateOp::Sum), "265000");
    assert_eq!(value("name", AggregateOp::Count), "5");

    for op in [AggregateOp::Avg, AggregateOp::Sum] {
        let err = db.aggregate(EMPLOYEES, "name", op, None).unwrap_err();
        assert!(matches!(err, Error::NonNumericColumn { .. }));
    }
}

#[test]
fn test_grouped_aggregation_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    insert_all(
        &mut db,
        EMPLOYEES_PROJECTS,
        Separator::Comma,
        &[
            "1,2,Developer",
            "3,2,Tester",
            "1,1,Developer",
            "4,2,Team Lead",
            "2,3,Project Manager",
            "2,1,Project Manager",
        ],
    );

    let result = db
        .aggregate(
            EMPLOYEES_PROJECTS,
            "employee_id",
            AggregateOp::Count,
            Some("project_id"),
        )
        .unwrap();

    assert_eq!(
        result,
        AggregateResult::Grouped(vec![
            row(&[("project_id", "2"), ("COUNT(employee_id)", "3")]),
            row(&[("project_id", "1"), ("COUNT(employee_id)", "2")]),
            row(&[("project_id", "3"), ("COUNT(employee_id)", "1")]),
        ])
    );
}

#[test]
fn test_reload_reproduces_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assignments.csv");

    let mut table = EmployeeProjectTable::new(CsvFileStore::new(&path), false).unwrap();
    for raw in ["2,1,Project Manager", "1,1,Developer", "3,2,Lead \"QA\""] {
        table.insert(raw, Separator::Comma).unwrap();
    }
    assert_eq!(table.rows()[2]["role"], "Lead \"QA\"");

    let reloaded = EmployeeProjectTable::new(CsvFileStore::new(&path), true).unwrap();
    assert_eq!(reloaded.rows(), table.rows());

    let mut lazy = EmployeeProjectTable::new(CsvFileStore::new(&path), false).unwrap();
    assert!(lazy.rows().is_empty());
    lazy.load().unwrap();
    assert_eq!(lazy.rows(), table.rows());
}

#[test]
fn test_reopened_database_keeps_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = database(dir.path());
    insert_all(&mut db, DEPARTMENTS, Separator::Space, &["3 Sales", "1 HR", "2 Finance"]);

    let config = DatabaseConfig::new().data_dir(dir.path());
    let reopened = Database::open(&config).unwrap();
    let names: Vec<&str> = reopened
        .table(DEPARTMENTS)
        .unwrap()
        .rows()
        .iter()
        .map(|r| r["department_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Sales", "HR", "Finance"]);

    // Uniqueness still holds against reloaded rows
    let mut reopened = reopened;
    assert!(reopened
        .insert(DEPARTMENTS, "1 Legal", Separator::Space)
        .unwrap_err()
        .is_uniqueness());
}

#[test]
fn test_tables_bound_to_custom_stores() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::new();
    db.register_table(
        "staff",
        EmployeeTable::new(CsvFileStore::new(dir.path().join("staff.csv")), true).unwrap(),
    );
    db.register_table(
        "units",
        DepartmentTable::new(CsvFileStore::new(dir.path().join("units.csv")), true).unwrap(),
    );
    db.register_table(
        "work",
        ProjectTable::new(CsvFileStore::new(dir.path().join("work.csv")), true).unwrap(),
    );

    db.insert("staff", "1 John 28 50000 7", Separator::Space)
        .unwrap();
    db.insert("units", "7 Legal", Separator::Space).unwrap();

    let rows = db
        .join(&["staff", "units"], &[vec!["staff.department_id", "units.id"]])
        .unwrap();
    assert_eq!(rows[0]["units.department_name"], "Legal");

    assert!(db.select("employees", &Selection::IdRange { start: 1, end: 1 }).unwrap().is_none());
    assert!(db
        .insert("employees", "1 John 28 50000 7", Separator::Space)
        .unwrap_err()
        .is_not_found());
}
