fn main() {
    macmodel_lib::run()
}
