#[cfg(test)]
mod tests {
    use crate::naming::sample_manifest;
    use crate::registry::UsageRegistry;
    use crate::scan::{is_vendored, scan_module, scan_modules, Module};
    use crate::test_support::*;

    fn app_module(path: &str, components: &[&str], directives: &[&str]) -> Module {
        Module::new(path, "").with_ast(render_module(components, directives))
    }

    #[test]
    fn test_scan_records_canonical_names() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        let module = app_module("/app/src/App.vue", &["q-btn", "QCard"], &["ripple"]);

        assert_eq!(scan_module(&module, &manifest, &registry), 3);
        assert_eq!(registry.components(), vec!["QBtn", "QCard"]);
        assert_eq!(registry.directives(), vec!["Ripple"]);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        let module = app_module("/app/src/App.vue", &["router-view", "q-btn-group"], &["focus"]);

        assert_eq!(scan_module(&module, &manifest, &registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_vendored_modules_are_skipped() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        let module = app_module("/app/node_modules/some-lib/Widget.vue", &["q-btn"], &[]);

        assert_eq!(scan_module(&module, &manifest, &registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_loader_chain_does_not_make_module_vendored() {
        assert!(!is_vendored(
            "/app/node_modules/vue-loader/dist/index.js!/app/src/App.vue?vue&type=template"
        ));
        assert!(is_vendored("/app/node_modules/babel-loader/lib/index.js!/app/node_modules/quasar/src/index.prod.js"));
    }

    #[test]
    fn test_module_without_factory_import_is_skipped() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        // Same calls, but `_resolveComponent` is a local function, not the vue import
        let ast = program(vec![
            const_decl("_component_q_btn", call("_resolveComponent", vec![string_literal("q-btn")])),
        ]);
        let module = Module::new("/app/src/App.vue", "").with_ast(ast);

        assert_eq!(scan_module(&module, &manifest, &registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unparsed_module_is_skipped() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        assert_eq!(scan_module(&Module::new("/app/src/a.js", "x"), &manifest, &registry), 0);
    }

    #[test]
    fn test_dynamic_names_are_skipped() {
        let manifest = sample_manifest();
        let registry = UsageRegistry::new();
        let ast = program(vec![
            import_decl("vue", vec![named_specifier("resolveComponent", "rc")]),
            expr_stmt(call("rc", vec![string_literal("q-btn")])),
            expr_stmt(call("rc", vec![ident("dynamicName")])),
        ]);
        let module = Module::new("/app/src/main.js", "").with_ast(ast);

        assert_eq!(scan_module(&module, &manifest, &registry), 1);
        assert_eq!(registry.components(), vec!["QBtn"]);
    }

    #[test]
    fn test_scan_is_order_independent() {
        let manifest = sample_manifest();
        let a = app_module("/app/src/A.vue", &["q-btn", "q-card"], &[]);
        let b = app_module("/app/src/B.vue", &["q-card", "q-card-section"], &["close-popup"]);

        let forward = UsageRegistry::new();
        scan_module(&a, &manifest, &forward);
        scan_module(&b, &manifest, &forward);

        let backward = UsageRegistry::new();
        scan_module(&b, &manifest, &backward);
        scan_module(&a, &manifest, &backward);
        scan_module(&a, &manifest, &backward);

        assert_eq!(forward.components(), backward.components());
        assert_eq!(forward.directives(), backward.directives());
        assert_eq!(forward.components(), vec!["QBtn", "QCard", "QCardSection"]);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let manifest = sample_manifest();
        let modules: Vec<Module> = (0..32)
            .map(|i| {
                let name = if i % 2 == 0 { "q-btn" } else { "q-card" };
                app_module(&format!("/app/src/C{}.vue", i), &[name], &["ripple"])
            })
            .collect();

        let registry = UsageRegistry::new();
        assert_eq!(scan_modules(&modules, &manifest, &registry), 64);
        assert_eq!(registry.components(), vec!["QBtn", "QCard"]);
        assert_eq!(registry.directives(), vec!["Ripple"]);
    }
}
