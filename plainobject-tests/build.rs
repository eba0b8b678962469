fn main() {
    // Generate serializers for the fixture model into OUT_DIR/PlainObjects.
    // Tests read the generated files back with include_str!.
    plainobject_codegen::generate_from_cargo_metadata().expect("codegen failed");
}
