// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rusqlite::Connection;
use spendwise::db::{self, TransactionSource};
use spendwise::models::TransactionStatus;
use spendwise::{cli, commands::importer};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

fn import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().get_matches_from(["spendwise", "import", "transactions", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    let file = csv_file("date,description,amount,category\n03/02/2025,Shop,-5.00,Food");
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    import(&mut conn, &padded).unwrap();
    assert_eq!(count(&conn), 1);
}

#[test]
fn importer_trims_fields_and_reads_optional_columns() {
    let mut conn = base_conn();
    let file = csv_file(
        "id,date,description,type,amount,balance,status,category\n\
         99, 03/02/2025 ,  Corner Shop  ,Payment,-20.00, 80.00 ,planned, Food ",
    );
    import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let rows = conn.list_transactions().unwrap();
    assert_eq!(rows.len(), 1);
    let tx = &rows[0];
    // ids come from the store, not the file
    assert_eq!(tx.id, "1");
    assert_eq!(tx.date, "03/02/2025");
    assert_eq!(tx.description, "Corner Shop");
    assert_eq!(tx.transaction_type, "Payment");
    assert_eq!(tx.amount, "-20.00".parse::<Decimal>().unwrap());
    assert_eq!(tx.wallet_balance, Some("80.00".parse().unwrap()));
    assert_eq!(tx.status, TransactionStatus::Planned);
    assert_eq!(tx.category.as_deref(), Some("Food"));
}

#[test]
fn importer_leaves_blank_category_unset() {
    let mut conn = base_conn();
    let file = csv_file("date,amount,category\n03/02/2025,-5,");
    import(&mut conn, file.path().to_str().unwrap()).unwrap();
    let rows = conn.list_transactions().unwrap();
    assert_eq!(rows[0].category, None);
    assert_eq!(rows[0].category_label(), "Uncategorized");
}

#[test]
fn importer_rejects_invalid_date() {
    let mut conn = base_conn();
    let file = csv_file("date,amount\n2025-02-03,-5.00");
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("date '2025-02-03' is not DD/MM/YYYY"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_rejects_invalid_amount() {
    let mut conn = base_conn();
    let file = csv_file("date,description,amount\n03/02/2025,Shop,abc");
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Invalid amount 'abc' on record 1"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_requires_amount_column() {
    let mut conn = base_conn();
    let file = csv_file("date,description\n03/02/2025,Shop");
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("no 'amount' column"));
}

#[test]
fn importer_rolls_back_when_row_fails() {
    let mut conn = base_conn();
    let file = csv_file("date,amount\n03/02/2025,-5.00\n31/02/2025,-7.00");
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("record 2"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_reads_json_with_numeric_and_text_amounts() {
    let mut conn = base_conn();
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"date": "01/03/2025", "description": "Rice", "amount": -12.5, "category": "Food"}},
            {{"date": "02/03/2025", "type": "Salary", "amount": "2500", "status": "Completed"}}
        ]"#
    )
    .unwrap();
    file.flush().unwrap();

    import(&mut conn, file.path().to_str().unwrap()).unwrap();
    let rows = conn.list_transactions().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].amount, "-12.5".parse::<Decimal>().unwrap());
    assert_eq!(rows[0].category.as_deref(), Some("Food"));
    assert_eq!(rows[1].amount, Decimal::from(2500));
    assert_eq!(rows[1].transaction_type, "Salary");
    assert_eq!(rows[1].status, TransactionStatus::Completed);
}

#[test]
fn importer_rejects_json_amount_of_wrong_type() {
    let mut conn = base_conn();
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"[{{"date": "01/03/2025", "amount": true}}]"#).unwrap();
    file.flush().unwrap();

    assert!(import(&mut conn, file.path().to_str().unwrap()).is_err());
    assert_eq!(count(&conn), 0);
}

#[test]
fn importer_rejects_unknown_status_naming_the_record() {
    let mut conn = base_conn();
    let file = csv_file("date,amount,status\n03/02/2025,-5,Success\n04/02/2025,-6,Pending");
    let err = import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("record 2"));
    assert!(msg.contains("'Pending'"));
    assert_eq!(count(&conn), 0);
}
