pub mod filter_docs;
