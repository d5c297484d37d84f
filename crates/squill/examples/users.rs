//! Creates `test.db` in the working directory with a `users` and a `books`
//! table. Running it again leaves both tables as they are.

use squill::prelude::*;

fn main() -> Result<()> {
    let id = || {
        Column::new("id", SqlType::Integer)
            .constraint(PrimaryKey)
            .constraint(AutoIncrement)
    };

    let schema = squill::schema(
        "test.db",
        [
            table("users", [id(), column::<String>("name").constraint(NotNull)]),
            table("books", [id(), column::<String>("title").constraint(NotNull)]),
        ],
    )?;

    for name in schema.table_names() {
        println!("table ready: {name}");
    }

    schema.close()
}
