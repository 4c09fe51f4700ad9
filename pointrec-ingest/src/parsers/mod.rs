pub mod points_csv;
