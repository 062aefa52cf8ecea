//! End-to-end tests for the GEDCOM codec: parsing fixtures, resolving them and writing
//! documents to disk.

mod export_tests;
