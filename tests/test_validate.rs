use anyhow;
use gffcheck::{
    render_errors, render_sorted, to_feature_table, validate, ErrorCode, ErrorContext,
    TypeHierarchy, UnknownFeatureType, ValidatorOptions,
};

// gene 1..9 and 10..18 on the + strand, gene 19..27 on the - strand
const GENOME: &str = ">phage\nATGAAATAAATGCCCTGA\nCTACCCCAT\n";

fn phage_gff() -> Vec<String> {
    [
        "##gff-version 3",
        "phage\tDNAMaster\texon\t19\t27\t.\t-\t.\tParent=m3",
        "phage\tDNAMaster\tgene\t10\t18\t.\t+\t.\tID=g2;Name=g2",
        "phage\tDNAMaster\tcontig\t1\t27\t.\t.\t.\tID=phage",
        "phage\tDNAMaster\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1",
        "phage\tDNAMaster\tmRNA\t19\t27\t.\t-\t.\tID=m3;Parent=g3",
        "phage\tDNAMaster\tmRNA\t1\t9\t.\t+\t.\tID=m1;Parent=g1",
        "",
        "phage\tDNAMaster\texon\t1\t9\t.\t+\t.\tParent=m1",
        "phage\tDNAMaster\tgene\t19\t27\t.\t-\t.\tID=g3;Name=g3",
        "phage\tDNAMaster\texon\t10\t18\t.\t+\t.\tParent=m2",
        "phage\tDNAMaster\tmRNA\t10\t18\t.\t+\t.\tID=m2;Parent=g2",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_gene_and_mrna() -> anyhow::Result<()> {
    let lines = [
        "phage\tsrc\tmRNA\t1\t9\t.\t+\t.\tID=m1;Parent=g1",
        "phage\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1",
    ];
    let options = ValidatorOptions {
        type_hierarchy: TypeHierarchy::new(&["gene", "mRNA"])?,
        ..Default::default()
    };
    let report = validate(&lines, ">phage\nATGAAATAA\n", &options)?;

    assert!(report.errors.is_empty());
    let types: Vec<&str> = report.sorted.iter().map(|l| l.feature_type()).collect();
    assert_eq!(types, vec!["gene", "mRNA"]);
    Ok(())
}

#[test]
fn test_phage_file() -> anyhow::Result<()> {
    let options = ValidatorOptions::default();
    let report = validate(&phage_gff(), GENOME, &options)?;

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.is_valid());

    let order: Vec<(&str, &str)> = report
        .sorted
        .iter()
        .map(|l| (l.feature_type(), l.start()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("contig", "1"),
            ("gene", "1"),
            ("mRNA", "1"),
            ("exon", "1"),
            ("gene", "10"),
            ("mRNA", "10"),
            ("exon", "10"),
            ("gene", "19"),
            ("mRNA", "19"),
            ("exon", "19"),
        ]
    );

    let sorted_text = render_sorted(&report);
    assert!(sorted_text.starts_with("##gff-version 3\nphage\tDNAMaster\tcontig\t"));
    assert_eq!(sorted_text.lines().count(), 11);
    Ok(())
}

#[test]
fn test_sorted_output_is_stable() -> anyhow::Result<()> {
    let options = ValidatorOptions::default();
    let first = validate(&phage_gff(), GENOME, &options)?;
    let once = first.sorted_lines();
    let second = validate(&once, GENOME, &options)?;
    assert_eq!(once, second.sorted_lines());
    Ok(())
}

#[test]
fn test_duplicate_id() -> anyhow::Result<()> {
    let lines = [
        "phage\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=a",
        "phage\tsrc\tmRNA\t1\t9\t.\t+\t.\tID=m1;Parent=g1",
        "phage\tsrc\tgene\t10\t18\t.\t+\t.\tID=g1;Name=b",
        "phage\tsrc\tmRNA\t10\t18\t.\t+\t.\tID=m2;Parent=g1",
    ];
    let options = ValidatorOptions {
        type_hierarchy: TypeHierarchy::new(&["gene", "mRNA"])?,
        ..Default::default()
    };
    let report = validate(&lines, GENOME, &options)?;

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, ErrorCode::GeneDuplicateId);
    assert_eq!(
        report.errors[0].to_string(),
        "[3] Line Error: 9th component = ID already used. Each ID must be unique."
    );
    Ok(())
}

#[test]
fn test_broken_file() -> anyhow::Result<()> {
    let lines = [
        "phage\tsrc\tcontig\t1\t27\t.\t.\t.\tID=phage",
        "phage\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1",
        "phage\tsrc\tmRNA\t1\t9\t.\t+\t.\tID=m1;Parent=g1",
        "phage\tsrc\texon\t1\t9\t.\t+\t.\tParent=m1",
        "phage\tsrc\tgene\t10\t15\t.\t+\t.\tID=g2;Name=g2",
        "phage\tsrc\texon\t10\t15\t.\t+\t.\tParent=g2",
        "phage\tsrc\tcontig\t1\t27\t.\t.\t.\tID=again",
        "phage\tsrc\tgene\t19\t27",
    ];
    let report = validate(&lines, GENOME, &ValidatorOptions::default())?;
    let codes: Vec<ErrorCode> = report.errors.iter().map(|e| e.code).collect();

    assert_eq!(
        codes,
        vec![
            // found while sorting
            ErrorCode::MultipleContigs,
            ErrorCode::LinesTooFew,
            ErrorCode::IncompleteGroup,
            // found while checking the gene at 10..15: ATG CCC, no stop
            ErrorCode::NoStop,
            // the exon follows the gene directly
            ErrorCode::BadSortOrIncompleteGroup,
        ]
    );
    assert_eq!(
        report.errors[2].context,
        ErrorContext::Coordinate(String::from("10"))
    );

    let text = render_errors(&report.errors, true);
    assert!(text.starts_with(
        "phage\tsrc\tcontig\t1\t27\t.\t.\t.\tID=again\n[7] Format Error: multiple contigs."
    ));
    assert!(text.contains("Coordinate 10 Format Error: each set of coordinates"));
    assert!(text.ends_with("\n\n"));
    Ok(())
}

#[test]
fn test_unknown_type_stops_the_run() -> anyhow::Result<()> {
    let lines = [
        "phage\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Name=g1",
        "phage\tsrc\tCDS\t1\t9\t.\t+\t.\tParent=g1",
    ];
    let res = validate(&lines, GENOME, &ValidatorOptions::default());
    let err = res.unwrap_err();
    let unknown = err
        .downcast_ref::<UnknownFeatureType>()
        .expect("an unknown type error");
    assert_eq!(unknown.found, "CDS");
    assert_eq!(
        err.to_string(),
        "The third component of each line must be one of the types. The types are: [gene, mRNA, exon] ."
    );
    Ok(())
}

#[test]
fn test_feature_table() -> anyhow::Result<()> {
    let report = validate(&phage_gff(), GENOME, &ValidatorOptions::default())?;
    let table = to_feature_table(&report.sorted);

    assert!(table.starts_with(">Feature phage\n1\t9\tgene\n  /gene=g1\n"));
    assert!(table.contains("27\t19\tgene\n  /gene=g3\n"));
    assert!(!table.contains("contig"));
    assert!(!table.contains("Parent"));
    Ok(())
}
