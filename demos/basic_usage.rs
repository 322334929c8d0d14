//! Basic usage of the document store: index lifecycle, upsert and search.

use salvia::DocumentStore;
use salvia::error::Result;

fn main() -> Result<()> {
    env_logger::init();

    let store = DocumentStore::new();
    store.new_index("books")?;

    store.save_doc("books", "dune", "A desert planet, spice and sandworms")?;
    store.save_doc("books", "neuromancer", "Console cowboys in cyberspace")?;
    store.save_doc("books", "dune", "Arrakis, the desert planet, source of the spice melange")?;

    println!("All documents:");
    for doc in store.all_docs("books")? {
        println!("  [{}] {}: {}", doc.id, doc.name, doc.content);
    }

    println!("Search 'desert':");
    for doc in store.search_doc("books", "desert")? {
        println!("  {}: {}", doc.name, doc.content);
    }

    store.del_doc("books", "neuromancer")?;
    println!("After delete, {} document(s) remain", store.all_docs("books")?.len());

    store.close_all()?;
    Ok(())
}
