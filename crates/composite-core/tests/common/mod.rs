//! Record types shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use composite_core::{Composite, Json, TableBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pair {
    pub a: i64,
    pub b: String,
}

impl Composite for Pair {
    const NAME: &'static str = "pair";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("a", |p| &p.a, |p| &mut p.a)
            .field("b", |p| &p.b, |p| &mut p.b);
    }
}

/// One text column; the workhorse for quoting tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Note {
    pub text: Option<String>,
}

impl Composite for Note {
    const NAME: &'static str = "note";

    fn describe(table: &mut TableBuilder<Self>) {
        table.field("text", |n| &n.text, |n| &mut n.text);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub zip: Option<i32>,
}

impl Composite for Address {
    const NAME: &'static str = "address";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("street", |a| &a.street, |a| &mut a.street)
            .field("zip", |a| &a.zip, |a| &mut a.zip);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub active: bool,
    pub home: Address,
    pub work: Option<Address>,
}

impl Composite for Person {
    const NAME: &'static str = "person";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("id", |p| &p.id, |p| &mut p.id)
            .field("name", |p| &p.name, |p| &mut p.name)
            .field("email", |p| &p.email, |p| &mut p.email)
            .field("active", |p| &p.active, |p| &mut p.active)
            .composite("home", |p| &p.home, |p| &mut p.home)
            .optional_composite("work", |p| &p.work, |p| &mut p.work);
    }
}

/// Three levels deep: `Envelope` → `Person` → `Address`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Envelope {
    pub seq: i32,
    pub person: Person,
}

impl Composite for Envelope {
    const NAME: &'static str = "envelope";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("seq", |e| &e.seq, |e| &mut e.seq)
            .composite("person", |e| &e.person, |e| &mut e.person);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub tags: Vec<String>,
    pub weight: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Everything {
    pub flag: bool,
    pub small: i16,
    pub int: i32,
    pub big: i64,
    pub unsigned: u32,
    pub real: f32,
    pub double: f64,
    pub text: String,
    pub bytes: Vec<u8>,
    pub day: NaiveDate,
    pub at: NaiveDateTime,
    pub stamp: DateTime<Utc>,
    pub meta: Json<Meta>,
    pub maybe: Option<i64>,
}

impl Composite for Everything {
    const NAME: &'static str = "everything";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("flag", |r| &r.flag, |r| &mut r.flag)
            .field("small", |r| &r.small, |r| &mut r.small)
            .field("int", |r| &r.int, |r| &mut r.int)
            .field("big", |r| &r.big, |r| &mut r.big)
            .field("unsigned", |r| &r.unsigned, |r| &mut r.unsigned)
            .field("real", |r| &r.real, |r| &mut r.real)
            .field("double", |r| &r.double, |r| &mut r.double)
            .field("text", |r| &r.text, |r| &mut r.text)
            .field("bytes", |r| &r.bytes, |r| &mut r.bytes)
            .field("day", |r| &r.day, |r| &mut r.day)
            .field("at", |r| &r.at, |r| &mut r.at)
            .field("stamp", |r| &r.stamp, |r| &mut r.stamp)
            .field("meta", |r| &r.meta, |r| &mut r.meta)
            .field("maybe", |r| &r.maybe, |r| &mut r.maybe);
    }
}

/// Declares the same field name twice; its table can never be built.
#[derive(Debug, Default)]
pub struct Broken {
    pub a: i32,
}

impl Composite for Broken {
    const NAME: &'static str = "broken";

    fn describe(table: &mut TableBuilder<Self>) {
        table
            .field("a", |b| &b.a, |b| &mut b.a)
            .field("a", |b| &b.a, |b| &mut b.a);
    }
}

/// No fields at all.
#[derive(Debug, Default, PartialEq)]
pub struct Unit;

impl Composite for Unit {
    const NAME: &'static str = "unit";

    fn describe(_table: &mut TableBuilder<Self>) {}
}

pub fn sample_person() -> Person {
    Person {
        id: 7,
        name: "Ada \"Countess\" Lovelace".to_string(),
        email: Some("ada@example.com".to_string()),
        active: true,
        home: Address {
            street: "12 St James's Sq, London".to_string(),
            zip: Some(10115),
        },
        work: None,
    }
}

pub fn lit(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
