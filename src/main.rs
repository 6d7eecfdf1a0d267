use tunneller::app::run;
fn main() {
    run::<f64>().unwrap();
}
