#![allow(dead_code)]

use chrono::NaiveDate;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::{Fake, Faker};
use fintrack_repo::account_repo::NewAccount;
use fintrack_repo::category_repo::{NewCategory, NewSubcategory};
use fintrack_repo::installment_plan_repo::NewInstallmentPlan;
use fintrack_repo::transaction_repo::{NewTransaction, NewTransactionUser};
use rand::seq::SliceRandom;
use uuid::Uuid;

pub fn test_user() -> String {
    "test-user-".to_owned() + &Uuid::new_v4().to_string()
}

pub fn id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

pub fn new_category(user_id: &str) -> NewCategory {
    let name = ["Misc", "Groceries", "Eating Out", "Transportation"]
        .choose(&mut rand::thread_rng())
        .unwrap();
    NewCategory {
        category_id: id("category"),
        name: name.to_string(),
        user_id: user_id.to_owned(),
    }
}

pub fn new_subcategory(category_id: &str) -> NewSubcategory {
    NewSubcategory {
        subcategory_id: id("subcategory"),
        name: Name().fake(),
        category_id: category_id.to_owned(),
    }
}

pub fn new_account(user_id: &str) -> NewAccount {
    NewAccount {
        account_id: id("account"),
        name: Name().fake(),
        user_id: user_id.to_owned(),
    }
}

pub fn new_plan(user_id: &str) -> NewInstallmentPlan {
    NewInstallmentPlan {
        installment_plan_id: id("plan"),
        total_amount: (100..100_000).fake(),
        number_of_installments: (1..24).fake(),
        description: Some(Sentence(3..8).fake()),
        start_date: Faker.fake(),
        end_date: None,
        user_id: user_id.to_owned(),
    }
}

pub fn new_transaction(account_id: &str) -> NewTransaction {
    NewTransaction {
        transaction_id: id("transaction"),
        amount: Faker.fake(),
        payee: Name().fake(),
        notes: Some(Sentence(5..10).fake()),
        date: Faker.fake(),
        account_id: account_id.to_owned(),
        category_id: None,
        installment_plan_id: None,
        installment_number: None,
    }
}

pub fn new_transaction_on(account_id: &str, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        date,
        ..new_transaction(account_id)
    }
}

pub fn new_split(transaction_id: &str, user_id: &str, amount: i32) -> NewTransactionUser {
    NewTransactionUser {
        transaction_id: transaction_id.to_owned(),
        user_id: user_id.to_owned(),
        amount,
    }
}
