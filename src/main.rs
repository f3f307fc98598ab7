fn main() {
    resty::cli::run();
}
