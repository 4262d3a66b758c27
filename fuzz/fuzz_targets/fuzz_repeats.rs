#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|inputs: Vec<String>| {
    let inputs: Vec<String> = inputs.into_iter().take(8).collect();
    let repeats = subthread::search::supermaximal_repeats(&inputs);

    for repeat in &repeats {
        assert!(repeat.occurrences() >= 2);
        assert!(repeat.source_count >= 1 && repeat.source_count <= inputs.len());
        assert!(inputs.iter().any(|s| s.contains(repeat.text.as_str())));
    }
});
