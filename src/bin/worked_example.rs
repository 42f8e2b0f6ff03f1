use pir_lessons::harness::harness_main;

fn main() -> pir_lessons::Result<()> {
    harness_main()
}
