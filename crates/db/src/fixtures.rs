//! Demo catalogue used for local runs.

use crate::models::BookDraft;
use crate::store::Store;

fn draft(title: &str, publication_year: i32) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        publication_year,
    }
}

/// Load three authors and four books into `store`. Returns the number of books inserted.
pub async fn seed_demo(store: &Store) -> usize {
    let catalogue = [
        (
            "J.K. Rowling",
            vec![
                draft("Harry Potter and the Philosopher's Stone", 1997),
                draft("Harry Potter and the Chamber of Secrets", 1998),
            ],
        ),
        ("J.R.R. Tolkien", vec![draft("The Hobbit", 1937)]),
        ("George R.R. Martin", vec![draft("A Game of Thrones", 1996)]),
    ];

    let mut inserted = 0;
    for (name, books) in catalogue {
        inserted += store.create_author(name.to_string(), books).await.books.len();
    }
    inserted
}
