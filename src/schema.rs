//! Structural definitions of the persisted tables and the relation graph
//! between them. The definitions are immutable and built at compile time;
//! the storage backends and their migrations must agree with them.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DataType {
    Text,
    Integer,
    Serial,
    Date,
}

/// Action the storage engine takes on dependent rows when the referenced
/// row is deleted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
}

pub struct Column {
    pub name: &'static str,
    pub data_type: DataType,
    pub nullable: bool,
}

pub struct ForeignKey {
    pub column: &'static str,
    pub parent_table: &'static str,
    pub parent_column: &'static str,
    pub on_delete: OnDelete,
}

pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

const fn required(name: &'static str, data_type: DataType) -> Column {
    Column {
        name,
        data_type,
        nullable: false,
    }
}

const fn nullable(name: &'static str, data_type: DataType) -> Column {
    Column {
        name,
        data_type,
        nullable: true,
    }
}

pub const TABLES: &[Table] = &[
    Table {
        name: "categories",
        primary_key: "category_id",
        columns: &[
            required("category_id", DataType::Text),
            required("name", DataType::Text),
            required("user_id", DataType::Text),
        ],
        foreign_keys: &[],
    },
    Table {
        name: "subcategories",
        primary_key: "subcategory_id",
        columns: &[
            required("subcategory_id", DataType::Text),
            required("name", DataType::Text),
            required("category_id", DataType::Text),
        ],
        foreign_keys: &[ForeignKey {
            column: "category_id",
            parent_table: "categories",
            parent_column: "category_id",
            on_delete: OnDelete::Cascade,
        }],
    },
    Table {
        name: "accounts",
        primary_key: "account_id",
        columns: &[
            required("account_id", DataType::Text),
            required("name", DataType::Text),
            required("user_id", DataType::Text),
        ],
        foreign_keys: &[],
    },
    Table {
        name: "installment_plans",
        primary_key: "installment_plan_id",
        columns: &[
            required("installment_plan_id", DataType::Text),
            required("total_amount", DataType::Integer),
            required("number_of_installments", DataType::Integer),
            nullable("description", DataType::Text),
            required("start_date", DataType::Date),
            nullable("end_date", DataType::Date),
            required("user_id", DataType::Text),
        ],
        foreign_keys: &[],
    },
    Table {
        name: "transactions",
        primary_key: "transaction_id",
        columns: &[
            required("transaction_id", DataType::Text),
            required("amount", DataType::Integer),
            required("payee", DataType::Text),
            nullable("notes", DataType::Text),
            required("date", DataType::Date),
            required("account_id", DataType::Text),
            nullable("category_id", DataType::Text),
            nullable("installment_plan_id", DataType::Text),
            nullable("installment_number", DataType::Integer),
        ],
        foreign_keys: &[
            ForeignKey {
                column: "account_id",
                parent_table: "accounts",
                parent_column: "account_id",
                on_delete: OnDelete::Cascade,
            },
            ForeignKey {
                column: "category_id",
                parent_table: "categories",
                parent_column: "category_id",
                on_delete: OnDelete::SetNull,
            },
            ForeignKey {
                column: "installment_plan_id",
                parent_table: "installment_plans",
                parent_column: "installment_plan_id",
                on_delete: OnDelete::Restrict,
            },
        ],
    },
    Table {
        name: "transaction_users",
        primary_key: "transaction_user_id",
        columns: &[
            required("transaction_user_id", DataType::Serial),
            required("transaction_id", DataType::Text),
            required("user_id", DataType::Text),
            required("amount", DataType::Integer),
        ],
        foreign_keys: &[ForeignKey {
            column: "transaction_id",
            parent_table: "transactions",
            parent_column: "transaction_id",
            on_delete: OnDelete::Cascade,
        }],
    },
];

pub fn table(name: &str) -> Option<&'static Table> {
    TABLES.iter().find(|t| t.name == name)
}

/// Foreign keys across the whole schema that point at `parent_table`.
pub fn referencing(
    parent_table: &str,
) -> impl Iterator<Item = (&'static Table, &'static ForeignKey)> + '_ {
    TABLES.iter().flat_map(move |t| {
        t.foreign_keys
            .iter()
            .filter(move |fk| fk.parent_table == parent_table)
            .map(move |fk| (t, fk))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_resolve_to_parent_primary_keys() {
        for t in TABLES {
            for fk in t.foreign_keys {
                assert!(
                    t.columns.iter().any(|c| c.name == fk.column),
                    "{}.{} does not exist",
                    t.name,
                    fk.column
                );
                let parent = table(fk.parent_table).unwrap();
                assert_eq!(parent.primary_key, fk.parent_column);
            }
        }
    }

    #[test]
    fn set_null_foreign_keys_are_nullable() {
        for t in TABLES {
            for fk in t.foreign_keys {
                if fk.on_delete == OnDelete::SetNull {
                    let column = t.columns.iter().find(|c| c.name == fk.column).unwrap();
                    assert!(column.nullable, "{}.{} must be nullable", t.name, fk.column);
                }
            }
        }
    }

    #[test]
    fn delete_actions_match_storage_layout() {
        let transactions = table("transactions").unwrap();
        let on_delete = |column: &str| {
            transactions
                .foreign_keys
                .iter()
                .find(|fk| fk.column == column)
                .unwrap()
                .on_delete
        };
        assert_eq!(on_delete("account_id"), OnDelete::Cascade);
        assert_eq!(on_delete("category_id"), OnDelete::SetNull);
        assert_eq!(on_delete("installment_plan_id"), OnDelete::Restrict);

        assert_eq!(
            table("subcategories").unwrap().foreign_keys[0].on_delete,
            OnDelete::Cascade
        );
        assert_eq!(
            table("transaction_users").unwrap().foreign_keys[0].on_delete,
            OnDelete::Cascade
        );
    }

    #[test]
    fn referencing_walks_the_relation_graph() {
        let dependents: Vec<&str> = referencing("categories").map(|(t, _)| t.name).collect();
        assert_eq!(dependents, vec!["subcategories", "transactions"]);
        assert_eq!(referencing("transaction_users").count(), 0);
    }
}
