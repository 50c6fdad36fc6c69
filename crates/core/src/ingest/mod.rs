pub mod results_csv;
