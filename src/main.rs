fn main() -> anyhow::Result<()> {
    teddy_lib::run()
}
