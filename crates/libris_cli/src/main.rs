//! Interactive menu shell over `libris_core`.
//!
//! # Responsibility
//! - Collect input, call catalog operations, print results.
//! - Load once at startup and save after every successful mutating call.
//!
//! The shell holds no business rules; every contract lives in the core
//! crate and failures are printed, never propagated as process exits.

use clap::Parser;
use libris_core::{
    default_log_level, init_logging, Catalog, CatalogError, JsonSnapshotStore, SnapshotStore,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// Library catalog manager: books, members, loans, fines.
#[derive(Debug, Parser)]
#[command(name = "libris", version)]
struct Args {
    /// Directory holding the books/members/loans snapshots.
    #[arg(long, default_value = "libris-data")]
    data_dir: PathBuf,

    /// Directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

const MENU: &str = "\
libris catalog
  1) add book        5) add member      9) return book
  2) list books      6) list members   10) list all loans
  3) search books    7) remove member  11) list active loans
  4) remove book     8) issue book     12) save  13) reload  0) quit";

fn main() {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("libris {} (library catalog)", libris_core::core_version());

    let store = JsonSnapshotStore::new(args.data_dir);
    let mut catalog = Catalog::new(store);
    catalog.load();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("\n{MENU}");
        let Some(choice) = read_line(&mut lines, "> ") else {
            break;
        };
        match choice.trim() {
            "1" => add_book(&mut catalog, &mut lines),
            "2" => list_books(&catalog),
            "3" => search_books(&catalog, &mut lines),
            "4" => remove_book(&mut catalog, &mut lines),
            "5" => add_member(&mut catalog, &mut lines),
            "6" => list_members(&catalog),
            "7" => remove_member(&mut catalog, &mut lines),
            "8" => issue_book(&mut catalog, &mut lines),
            "9" => return_book(&mut catalog, &mut lines),
            "10" => list_loans(&catalog, false),
            "11" => list_loans(&catalog, true),
            "12" => match catalog.save() {
                Ok(()) => println!("saved"),
                Err(err) => println!("warning: could not save catalog: {err}"),
            },
            "13" => {
                catalog.load();
                println!("reloaded");
            }
            "0" | "q" => break,
            other => println!("unknown choice `{other}`"),
        }
    }
    println!("bye");
}

type Lines<'a> = std::io::Lines<io::StdinLock<'a>>;

fn read_line(lines: &mut Lines<'_>, prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => Some(line),
        _ => None,
    }
}

fn read_uuid(lines: &mut Lines<'_>, prompt: &str) -> Option<Uuid> {
    let raw = read_line(lines, prompt)?;
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            println!("not a valid id: `{}`", raw.trim());
            None
        }
    }
}

/// Persists after a successful mutation; a failed save is reported and the
/// shell keeps running.
fn save_after_mutation<S: SnapshotStore>(catalog: &Catalog<S>) {
    if let Err(err) = catalog.save() {
        println!("warning: could not save catalog: {err}");
    }
}

fn report(err: CatalogError) {
    println!("cannot do that: {err}");
}

fn add_book<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(title) = read_line(lines, "title: ") else { return };
    let Some(author) = read_line(lines, "author: ") else { return };
    let Some(isbn) = read_line(lines, "isbn (blank for none): ") else { return };
    let Some(copies) = read_line(lines, "copies: ") else { return };
    let copies = copies.trim().parse::<u32>().unwrap_or(1);
    let isbn = match isbn.trim() {
        "" => None,
        value => Some(value.to_string()),
    };
    let id = catalog.add_book(title.trim(), author.trim(), isbn, copies);
    println!("added book {id}");
    save_after_mutation(catalog);
}

fn list_books<S: SnapshotStore>(catalog: &Catalog<S>) {
    if catalog.list_books().is_empty() {
        println!("no books");
        return;
    }
    for book in catalog.list_books() {
        println!(
            "{}  {} — {} [{}] {}/{} available",
            book.id,
            book.title,
            book.author,
            book.isbn.as_deref().unwrap_or("-"),
            book.available_copies,
            book.total_copies
        );
    }
}

fn search_books<S: SnapshotStore>(catalog: &Catalog<S>, lines: &mut Lines<'_>) {
    let Some(keyword) = read_line(lines, "keyword: ") else { return };
    let matches = catalog.search_books(keyword.trim());
    if matches.is_empty() {
        println!("no matches");
        return;
    }
    for book in matches {
        println!("{}  {} — {}", book.id, book.title, book.author);
    }
}

fn remove_book<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(id) = read_uuid(lines, "book id: ") else { return };
    match catalog.remove_book(id) {
        Ok(()) => {
            println!("removed");
            save_after_mutation(catalog);
        }
        Err(err) => report(err),
    }
}

fn add_member<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(name) = read_line(lines, "name: ") else { return };
    let Some(email) = read_line(lines, "email: ") else { return };
    let Some(phone) = read_line(lines, "phone: ") else { return };
    let id = catalog.add_member(name.trim(), email.trim(), phone.trim());
    println!("added member {id}");
    save_after_mutation(catalog);
}

fn list_members<S: SnapshotStore>(catalog: &Catalog<S>) {
    if catalog.list_members().is_empty() {
        println!("no members");
        return;
    }
    for member in catalog.list_members() {
        println!(
            "{}  {} <{}> {}",
            member.id, member.name, member.email, member.phone
        );
    }
}

fn remove_member<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(id) = read_uuid(lines, "member id: ") else { return };
    match catalog.remove_member(id) {
        Ok(()) => {
            println!("removed");
            save_after_mutation(catalog);
        }
        Err(err) => report(err),
    }
}

fn issue_book<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(book_id) = read_uuid(lines, "book id: ") else { return };
    let Some(member_id) = read_uuid(lines, "member id: ") else { return };
    match catalog.issue_book(book_id, member_id) {
        Ok(loan) => {
            println!("issued loan {} due {}", loan.id, loan.due_date);
            save_after_mutation(catalog);
        }
        Err(err) => report(err),
    }
}

fn return_book<S: SnapshotStore>(catalog: &mut Catalog<S>, lines: &mut Lines<'_>) {
    let Some(loan_id) = read_uuid(lines, "loan id: ") else { return };
    match catalog.return_book(loan_id) {
        Ok(fine) => {
            if fine > 0 {
                println!("returned; fine owed: {fine}");
            } else {
                println!("returned on time");
            }
            save_after_mutation(catalog);
        }
        Err(err) => report(err),
    }
}

fn list_loans<S: SnapshotStore>(catalog: &Catalog<S>, only_active: bool) {
    let loans = catalog.list_loans(only_active);
    if loans.is_empty() {
        println!("no loans");
        return;
    }
    for loan in loans {
        let status = match loan.return_date {
            Some(date) => format!("returned {date}"),
            None => format!("due {}", loan.due_date),
        };
        println!(
            "{}  book={} member={} issued {} ({})",
            loan.id, loan.book_id, loan.member_id, loan.issue_date, status
        );
    }
}
